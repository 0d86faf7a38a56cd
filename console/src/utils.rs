use std::path::Path;

use anyhow::{
    ensure,
    Context,
};
use clap::Args;
use hicloops::utils::{
    n_threads,
    THREADS_ENV_VAR,
};
use log::{
    debug,
    LevelFilter,
};

use crate::strings::utils as strings;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 'T',
        long,
        default_value_t = 0,
        help_heading = "UTILS",
        help = strings::THREADS
    )]
    pub threads: usize,
    #[arg(
        short,
        long,
        default_value_t = false,
        help_heading = "UTILS",
        help = strings::VERBOSE
    )]
    pub verbose: bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        init_logger(self.verbose)?;
        init_rayon_threads(self.threads);
        debug!("Using {} threads", n_threads());
        Ok(())
    }
}

pub(crate) fn init_logger(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    }
    else {
        LevelFilter::Info
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .try_init()
        .context("Failed to set up logger")
}

/// Sizes the library thread pool. Must run before the pool is first used.
pub(crate) fn init_rayon_threads(threads: usize) {
    if threads > 0 {
        std::env::set_var(THREADS_ENV_VAR, threads.to_string());
    }
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<&Path> {
    ensure!(path.exists(), "Path {} does not exist", path.display());
    ensure!(path.is_file(), "Path {} is not a file", path.display());
    Ok(path)
}

pub(crate) fn validate_output(path: &Path) -> anyhow::Result<&Path> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure!(
            parent.is_dir(),
            "Output directory {} does not exist",
            parent.display()
        );
    }
    Ok(path)
}
