use std::fmt::Display;
use std::str::FromStr;

use anyhow::{
    bail,
    ensure,
};
use log::{
    debug,
    info,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::ScoreType;
use crate::data_structs::InteractionRecord;
use crate::utils::percentile;
use crate::with_field_fn;

/// How the score cutoff of a [`ScoreFilter`] is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Keep records with `score >= value`; nothing is computed from the data.
    Absolute(ScoreType),
    /// Keep records at or above the given percentile (`0..=100`) of the
    /// distance-filtered scores.
    Percentile(f64),
}

impl Default for ThresholdMode {
    fn default() -> Self {
        Self::Percentile(98.0)
    }
}

impl Display for ThresholdMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Absolute(v) => write!(f, "absolute:{}", v),
            Self::Percentile(p) => write!(f, "percentile:{}", p),
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = match s.split_once(':') {
            Some(split) => split,
            None => bail!("Threshold should be '<absolute|percentile>:<value>'"),
        };
        let value = value.parse::<f64>()?;
        match kind.to_lowercase().as_str() {
            "absolute" | "abs" => Ok(Self::Absolute(value)),
            "percentile" | "pct" => Ok(Self::Percentile(value)),
            other => bail!("Threshold mode {} not implemented", other),
        }
    }
}

impl ThresholdMode {
    fn validate(&self) -> anyhow::Result<()> {
        match *self {
            Self::Absolute(v) => {
                ensure!(!v.is_nan(), "Absolute threshold must be a number")
            },
            Self::Percentile(p) => {
                ensure!(
                    p.is_finite() && (0.0..=100.0).contains(&p),
                    "Percentile must be within [0, 100], got {}",
                    p
                )
            },
        }
        Ok(())
    }
}

/// Result of [`ScoreFilter::apply`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutput {
    /// Records passing both filters, in input order.
    pub records:         Vec<InteractionRecord>,
    /// Number of records passing the distance filter.
    pub n_distance_pass: usize,
    /// Score cutoff that was applied. `None` if no record passed the
    /// distance filter.
    pub threshold:       Option<ScoreType>,
}

/// Two-stage record filter: distance from the diagonal first, then score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFilter {
    /// Minimum `bin2 - bin1`
    pub min_dist:  i64,
    pub threshold: ThresholdMode,
}

impl Default for ScoreFilter {
    fn default() -> Self {
        Self {
            min_dist:  5,
            threshold: ThresholdMode::default(),
        }
    }
}

impl ScoreFilter {
    with_field_fn!(min_dist, i64);
    with_field_fn!(threshold, ThresholdMode);

    pub fn new(
        min_dist: i64,
        threshold: ThresholdMode,
    ) -> Self {
        Self {
            min_dist,
            threshold,
        }
    }

    /// Applies the distance filter, derives the cutoff and applies the score
    /// filter. The output keeps input order.
    pub fn apply(
        &self,
        records: &[InteractionRecord],
    ) -> anyhow::Result<FilterOutput> {
        self.threshold.validate()?;
        ensure!(
            self.min_dist >= 1,
            "Minimum distance from the diagonal must be at least 1 bin, got {}",
            self.min_dist
        );

        let by_distance = records
            .iter()
            .filter(|r| r.distance() >= self.min_dist)
            .copied()
            .collect::<Vec<_>>();
        debug!(
            "{} of {} records pass min distance {}",
            by_distance.len(),
            records.len(),
            self.min_dist
        );

        if by_distance.is_empty() {
            info!("No records left after distance filtering");
            return Ok(FilterOutput::default());
        }

        let threshold = match self.threshold {
            ThresholdMode::Absolute(value) => value,
            ThresholdMode::Percentile(p) => {
                let scores = by_distance.iter().map(|r| r.score()).collect::<Vec<_>>();
                let value = percentile(&scores, p)?;
                info!(
                    "Calculated threshold (top {:.1}%): {:.5}",
                    100.0 - p,
                    value
                );
                value
            },
        };

        let n_distance_pass = by_distance.len();
        let records = by_distance
            .into_iter()
            .filter(|r| r.score() >= threshold)
            .collect::<Vec<_>>();
        debug!(
            "{} records pass score threshold {}",
            records.len(),
            threshold
        );

        Ok(FilterOutput {
            records,
            n_distance_pass,
            threshold: Some(threshold),
        })
    }
}
