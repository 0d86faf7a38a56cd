use std::path::PathBuf;

use clap::Args;
use hicloops::io::{
    read_tiers,
    write_merged_file,
};
use hicloops::prelude::*;
use itertools::Itertools;
use log::info;

use crate::strings::merge as strings;
use crate::utils::validate_output;
use crate::PipelineCommand;

#[derive(Args, Debug, Clone)]
pub(crate) struct MergeArgs {
    #[arg(short, long, num_args = 1.., required = true, help = strings::FILES)]
    files:       Vec<PathBuf>,
    #[arg(short, long, num_args = 1.., required = true, help = strings::RESOLUTIONS)]
    resolutions: Vec<ResType>,
    #[arg(short, long, required = true, help = strings::OUT)]
    out:         PathBuf,
    #[arg(short, long, default_value_t = 20_000, help = strings::TOLERANCE)]
    tolerance:   PosType,
}

impl PipelineCommand for MergeArgs {
    fn run(&self) -> anyhow::Result<()> {
        validate_output(&self.out)?;
        let tiers = read_tiers(&self.files, &self.resolutions)?;

        info!(
            "Merging resolutions {} with tolerance {}bp",
            self.resolutions.iter().sorted().join(", "),
            self.tolerance
        );
        let merged = ResolutionMerger::new(self.tolerance).merge(tiers)?;
        for (res, count) in merged.provenance_counts() {
            info!("  {}bp: {} loops", res, count);
        }
        write_merged_file(&self.out, &merged)?;
        Ok(())
    }
}
