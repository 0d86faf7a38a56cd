mod call;
mod merge;
mod prepare;
mod strings;
mod utils;

use call::CallArgs;
use clap::{
    Parser,
    Subcommand,
};
use merge::MergeArgs;
use prepare::PrepareArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

pub(crate) trait PipelineCommand {
    fn run(&self) -> anyhow::Result<()>;
}

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Join observed and O/E Juicer dumps into a scored interaction table
    Prepare {
        #[clap(flatten)]
        args:  PrepareArgs,
        #[clap(flatten)]
        utils: UtilsArgs,
    },

    /// Call loops from scored bin pairs of one chromosome
    Call {
        #[clap(flatten)]
        args:  CallArgs,
        #[clap(flatten)]
        utils: UtilsArgs,
    },

    /// Merge loop calls of several resolutions into one set
    Merge {
        #[clap(flatten)]
        args:  MergeArgs,
        #[clap(flatten)]
        utils: UtilsArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Prepare { args, utils } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Call { args, utils } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Merge { args, utils } => {
            utils.setup()?;
            args.run()?;
        },
    }
    Ok(())
}
