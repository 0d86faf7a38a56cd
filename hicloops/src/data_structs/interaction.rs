use std::str::FromStr;

use anyhow::{
    bail,
    Context,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::typedef::{
    BinIdx,
    ScoreType,
};

/// Raw scored bin pair produced by the interaction-scoring model.
///
/// Records describe upper-triangular contacts, so `bin2 - bin1` is the
/// genomic distance in bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    bin1:  BinIdx,
    bin2:  BinIdx,
    score: ScoreType,
}

impl InteractionRecord {
    pub fn new(
        bin1: BinIdx,
        bin2: BinIdx,
        score: ScoreType,
    ) -> Self {
        Self { bin1, bin2, score }
    }

    pub fn bin1(&self) -> BinIdx {
        self.bin1
    }

    pub fn bin2(&self) -> BinIdx {
        self.bin2
    }

    pub fn score(&self) -> ScoreType {
        self.score
    }

    /// Signed distance from the diagonal, `bin2 - bin1`.
    pub fn distance(&self) -> i64 {
        i64::from(self.bin2) - i64::from(self.bin1)
    }
}

impl FromStr for InteractionRecord {
    type Err = anyhow::Error;

    /// Parses a whitespace-delimited `bin1 bin2 score` line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split_whitespace().collect::<Vec<_>>();
        if fields.len() != 3 {
            bail!(
                "Expected 3 whitespace-delimited fields, found {}",
                fields.len()
            )
        }
        let bin1 = fields[0]
            .parse::<BinIdx>()
            .with_context(|| format!("Invalid bin index '{}'", fields[0]))?;
        let bin2 = fields[1]
            .parse::<BinIdx>()
            .with_context(|| format!("Invalid bin index '{}'", fields[1]))?;
        let score = fields[2]
            .parse::<ScoreType>()
            .with_context(|| format!("Invalid score '{}'", fields[2]))?;
        Ok(Self::new(bin1, bin2, score))
    }
}
