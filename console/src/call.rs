use std::path::PathBuf;

use clap::Args;
use hicloops::io::{
    read_interactions_file,
    write_loop_set_file,
};
use hicloops::prelude::*;
use log::info;

use crate::strings::call as strings;
use crate::utils::{
    validate_input,
    validate_output,
};
use crate::PipelineCommand;

#[derive(Args, Debug, Clone)]
pub(crate) struct CallArgs {
    #[arg(short, long, required = true, help = strings::INPUT)]
    input: PathBuf,
    #[arg(short, long, required = true, help = strings::OUT)]
    out:   PathBuf,
    #[arg(short, long, required = true, help = strings::CHROM)]
    chrom: String,
    #[arg(short, long, required = true, help = strings::RES)]
    res:   ResType,

    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(i64).range(1..),
        help_heading = "FILTER ARGS",
        help = strings::MIN_DIST
    )]
    min_dist:   i64,
    #[arg(
        short,
        long,
        default_value_t = 98.0,
        help_heading = "FILTER ARGS",
        help = strings::PERCENTILE
    )]
    percentile: f64,

    #[arg(
        long,
        conflicts_with = "percentile",
        help_heading = "CLUSTER ARGS",
        help = strings::CLUSTER_THRESHOLD
    )]
    cluster_threshold: Option<ScoreType>,
    #[arg(
        long,
        default_value_t = 2.0,
        requires = "cluster_threshold",
        help_heading = "CLUSTER ARGS",
        help = strings::EPS
    )]
    eps:               f64,
    #[arg(
        long,
        default_value_t = 3,
        requires = "cluster_threshold",
        help_heading = "CLUSTER ARGS",
        help = strings::MIN_SAMPLES
    )]
    min_samples:       usize,
}

impl CallArgs {
    fn config(&self) -> CallConfig {
        let strategy = match self.cluster_threshold {
            Some(threshold) => {
                CallStrategy::Cluster {
                    threshold,
                    eps: self.eps,
                    min_samples: self.min_samples,
                }
            },
            None => CallStrategy::Percentile(self.percentile),
        };
        CallConfig::default()
            .with_min_dist(self.min_dist)
            .with_strategy(strategy)
            .with_resolution(self.res)
    }
}

impl PipelineCommand for CallArgs {
    fn run(&self) -> anyhow::Result<()> {
        validate_input(&self.input)?;
        validate_output(&self.out)?;

        let records = read_interactions_file(&self.input)?;
        info!("Read {} records from {}", records.len(), self.input.display());

        let caller = LoopCaller::new(self.config());
        let (loops, summary) = caller.call(&self.chrom, &records)?;

        info!(
            "Records passing distance filter (>= {} bins): {}",
            caller.config().min_dist,
            summary.n_distance_pass
        );
        match summary.threshold {
            Some(threshold) => {
                info!(
                    "Significant records (score >= {:.5}): {}",
                    threshold, summary.n_significant
                )
            },
            None => info!("No records passed the distance filter"),
        }
        write_loop_set_file(&self.out, &loops)?;
        Ok(())
    }
}
