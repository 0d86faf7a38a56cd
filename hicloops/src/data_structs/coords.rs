use std::fmt::Display;

use anyhow::{
    ensure,
    Context,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::typedef::{
    BinIdx,
    PosType,
    ResType,
};

/// Half-open base-pair interval `[start, end)` covered by one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BinInterval {
    start: PosType,
    end:   PosType,
}

impl BinInterval {
    /// Creates a new `BinInterval`.
    pub fn new(
        start: PosType,
        end: PosType,
    ) -> Self {
        assert!(
            start <= end,
            "Start position must be less than or equal to end position"
        );
        Self { start, end }
    }

    /// Maps a bin index to `[index * resolution, index * resolution + resolution)`.
    pub fn from_bin(
        index: BinIdx,
        resolution: ResType,
    ) -> Self {
        let start = PosType::from(index) * resolution;
        Self {
            start,
            end: start + resolution,
        }
    }

    pub fn start(&self) -> PosType {
        self.start
    }

    pub fn end(&self) -> PosType {
        self.end
    }

    pub fn length(&self) -> PosType {
        self.end - self.start
    }

    /// Midpoint of the interval, `(start + end) / 2`.
    pub fn midpoint(&self) -> f64 {
        (self.start as f64 + self.end as f64) / 2.0
    }
}

impl Display for BinInterval {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Shorthand for [`BinInterval::from_bin`].
pub fn bin_to_interval(
    index: BinIdx,
    resolution: ResType,
) -> BinInterval {
    BinInterval::from_bin(index, resolution)
}

/// Bin index containing base-pair position `pos` (`pos / resolution`,
/// truncated).
pub fn pos_to_bin(
    pos: PosType,
    resolution: ResType,
) -> anyhow::Result<BinIdx> {
    ensure!(resolution > 0, "Resolution must be positive");
    BinIdx::try_from(pos / resolution).with_context(|| {
        format!(
            "Position {} at resolution {} exceeds the bin index range",
            pos, resolution
        )
    })
}
