use std::fmt::Display;
use std::str::FromStr;

use anyhow::{
    bail,
    ensure,
    Context,
};
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::cluster::DensityClusterer;
use super::filter::{
    ScoreFilter,
    ThresholdMode,
};
use crate::data_structs::typedef::{
    ResType,
    ScoreType,
};
use crate::data_structs::{
    InteractionRecord,
    LoopCall,
    LoopSet,
};
use crate::utils::THREAD_POOL;
use crate::with_field_fn;

/// How significant records become loop calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CallStrategy {
    /// Every record at or above the given percentile of the
    /// distance-filtered scores is reported as a loop.
    Percentile(f64),
    /// Records at or above an absolute pre-threshold are grouped by DBSCAN
    /// and each cluster is reported as one loop.
    Cluster {
        threshold:   ScoreType,
        eps:         f64,
        min_samples: usize,
    },
}

impl Default for CallStrategy {
    fn default() -> Self {
        Self::Percentile(98.0)
    }
}

impl Display for CallStrategy {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Percentile(p) => write!(f, "percentile:{}", p),
            Self::Cluster {
                threshold,
                eps,
                min_samples,
            } => write!(f, "cluster:{}:{}:{}", threshold, eps, min_samples),
        }
    }
}

impl FromStr for CallStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s.split(':').collect_vec();
        match split[0] {
            "percentile" => {
                ensure!(
                    split.len() == 2,
                    "There should be exactly 1 ':' delimited parameter for 'percentile'"
                );
                Ok(Self::Percentile(split[1].parse()?))
            },
            "cluster" => {
                ensure!(
                    split.len() == 4,
                    "There should be exactly 3 ':' delimited parameters for 'cluster'"
                );
                Ok(Self::Cluster {
                    threshold:   split[1].parse()?,
                    eps:         split[2].parse()?,
                    min_samples: split[3].parse()?,
                })
            },
            other => bail!("Call strategy {} not implemented", other),
        }
    }
}

impl CallStrategy {
    fn threshold_mode(&self) -> ThresholdMode {
        match *self {
            Self::Percentile(p) => ThresholdMode::Percentile(p),
            Self::Cluster { threshold, .. } => ThresholdMode::Absolute(threshold),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallConfig {
    /// Minimum distance from the diagonal, in bins. Must be at least 1.
    pub min_dist:   i64,
    pub strategy:   CallStrategy,
    /// Bin width in bp
    pub resolution: ResType,
}

impl CallConfig {
    with_field_fn!(min_dist, i64);
    with_field_fn!(strategy, CallStrategy);
    with_field_fn!(resolution, ResType);

    pub fn new(
        min_dist: i64,
        strategy: CallStrategy,
        resolution: ResType,
    ) -> Self {
        Self {
            min_dist,
            strategy,
            resolution,
        }
    }

    pub fn score_filter(&self) -> ScoreFilter {
        ScoreFilter::new(self.min_dist, self.strategy.threshold_mode())
    }
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            min_dist:   5,
            strategy:   CallStrategy::default(),
            resolution: 10_000,
        }
    }
}

/// Counters describing one chromosome's loop calling run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CallSummary {
    pub n_records:       usize,
    pub n_distance_pass: usize,
    pub n_significant:   usize,
    pub n_loops:         usize,
    pub threshold:       Option<ScoreType>,
}

/// Turns raw interaction records of one chromosome into a [`LoopSet`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoopCaller {
    config: CallConfig,
}

impl LoopCaller {
    pub fn new(config: CallConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    pub fn call(
        &self,
        chr: &str,
        records: &[InteractionRecord],
    ) -> anyhow::Result<(LoopSet, CallSummary)> {
        let resolution = self.config.resolution;
        ensure!(resolution > 0, "Resolution must be positive");
        info!(
            "Calling loops for {} @ {}bp: strategy {}, min distance {} bins",
            chr, resolution, self.config.strategy, self.config.min_dist
        );

        let filtered = self.config.score_filter().apply(records)?;
        let significant = filtered.records;

        let calls = match self.config.strategy {
            CallStrategy::Percentile(_) => {
                significant
                    .iter()
                    .map(|r| LoopCall::new(r.bin1(), r.bin2(), r.score(), resolution))
                    .collect_vec()
            },
            CallStrategy::Cluster {
                eps, min_samples, ..
            } => {
                DensityClusterer::new(eps, min_samples)
                    .cluster(&significant, resolution)
                    .with_context(|| format!("Clustering failed for {}", chr))?
            },
        };

        let summary = CallSummary {
            n_records:       records.len(),
            n_distance_pass: filtered.n_distance_pass,
            n_significant:   significant.len(),
            n_loops:         calls.len(),
            threshold:       filtered.threshold,
        };
        info!("Loops found on {}: {}", chr, summary.n_loops);
        Ok((LoopSet::new(chr, resolution, calls), summary))
    }

    /// Calls loops for several chromosomes in parallel on [`THREAD_POOL`].
    /// Output order follows input order.
    pub fn call_many(
        &self,
        inputs: Vec<(String, Vec<InteractionRecord>)>,
    ) -> anyhow::Result<Vec<(LoopSet, CallSummary)>> {
        THREAD_POOL.install(|| {
            inputs
                .into_par_iter()
                .map(|(chr, records)| self.call(&chr, &records))
                .collect::<anyhow::Result<Vec<_>>>()
        })
    }
}
