use std::cmp::Ordering;

use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use super::coords::{
    pos_to_bin,
    BinInterval,
};
use super::typedef::{
    BinIdx,
    ResType,
    ScoreType,
};

pub const DEFAULT_NAME: &str = ".";
pub const DEFAULT_COLOR: &str = "0,0,0";

/// A called chromatin loop: two anchors and a confidence score.
///
/// Calls produced by the loop caller span one bin per anchor and satisfy
/// `anchor2 > anchor1`. Calls read back from BEDPE keep their base-pair
/// intervals, name and color as written, whatever their width. `provenance`
/// is set once the call has passed through cross-resolution merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopCall {
    anchor1:    BinIdx,
    anchor2:    BinIdx,
    x:          BinInterval,
    y:          BinInterval,
    score:      ScoreType,
    resolution: ResType,
    provenance: Option<ResType>,
    name:       String,
    color:      String,
}

impl LoopCall {
    pub fn new(
        anchor1: BinIdx,
        anchor2: BinIdx,
        score: ScoreType,
        resolution: ResType,
    ) -> Self {
        Self {
            anchor1,
            anchor2,
            x: BinInterval::from_bin(anchor1, resolution),
            y: BinInterval::from_bin(anchor2, resolution),
            score,
            resolution,
            provenance: None,
            name: DEFAULT_NAME.to_owned(),
            color: DEFAULT_COLOR.to_owned(),
        }
    }

    /// Creates a call from base-pair intervals of any width. Anchors are the
    /// `resolution` bins holding the interval starts.
    pub fn from_intervals(
        x: BinInterval,
        y: BinInterval,
        score: ScoreType,
        resolution: ResType,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            anchor1: pos_to_bin(x.start(), resolution)?,
            anchor2: pos_to_bin(y.start(), resolution)?,
            x,
            y,
            score,
            resolution,
            provenance: None,
            name: DEFAULT_NAME.to_owned(),
            color: DEFAULT_COLOR.to_owned(),
        })
    }

    pub fn with_provenance(
        mut self,
        resolution: ResType,
    ) -> Self {
        self.provenance = Some(resolution);
        self
    }

    pub fn with_label(
        mut self,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.color = color.into();
        self
    }

    pub fn anchor1(&self) -> BinIdx {
        self.anchor1
    }

    pub fn anchor2(&self) -> BinIdx {
        self.anchor2
    }

    pub fn score(&self) -> ScoreType {
        self.score
    }

    pub fn resolution(&self) -> ResType {
        self.resolution
    }

    /// Resolution tier the call was accepted from during merging.
    pub fn provenance(&self) -> Option<ResType> {
        self.provenance
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Base-pair interval of the first anchor.
    pub fn x_interval(&self) -> BinInterval {
        self.x
    }

    /// Base-pair interval of the second anchor.
    pub fn y_interval(&self) -> BinInterval {
        self.y
    }

    /// Centroid `((x1 + x2) / 2, (y1 + y2) / 2)` in base pairs.
    pub fn centroid(&self) -> (f64, f64) {
        (self.x.midpoint(), self.y.midpoint())
    }

    /// Orders calls by the genomic coordinates of their first anchor.
    pub fn cmp_genomic(
        &self,
        other: &Self,
    ) -> Ordering {
        self.x.cmp(&other.x)
    }
}

/// Loop calls of a single chromosome at a single resolution, kept sorted by
/// the base-pair intervals of their anchors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoopSet {
    chr:        String,
    resolution: ResType,
    loops:      Vec<LoopCall>,
}

impl LoopSet {
    /// Creates a new `LoopSet`, sorting `loops` by `(x, y)` intervals. The
    /// sort is stable.
    pub fn new(
        chr: impl Into<String>,
        resolution: ResType,
        mut loops: Vec<LoopCall>,
    ) -> Self {
        loops.sort_by_key(|l| (l.x, l.y));
        Self {
            chr: chr.into(),
            resolution,
            loops,
        }
    }

    pub fn empty(
        chr: impl Into<String>,
        resolution: ResType,
    ) -> Self {
        Self::new(chr, resolution, Vec::new())
    }

    pub fn chr(&self) -> &str {
        &self.chr
    }

    pub fn resolution(&self) -> ResType {
        self.resolution
    }

    pub fn loops(&self) -> &[LoopCall] {
        &self.loops
    }

    pub fn into_loops(self) -> Vec<LoopCall> {
        self.loops
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoopCall> {
        self.loops.iter()
    }
}

impl<'a> IntoIterator for &'a LoopSet {
    type IntoIter = std::slice::Iter<'a, LoopCall>;
    type Item = &'a LoopCall;

    fn into_iter(self) -> Self::IntoIter {
        self.loops.iter()
    }
}

/// Deduplicated loop calls gathered from several resolution tiers.
///
/// Every call carries its [`LoopCall::provenance`]. Calls are ordered by
/// `(x1, x2)` in base pairs; the chromosome is shared by all entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergedLoopSet {
    chr:   String,
    loops: Vec<LoopCall>,
}

impl MergedLoopSet {
    pub fn new(
        chr: impl Into<String>,
        mut loops: Vec<LoopCall>,
    ) -> Self {
        loops.sort_by(LoopCall::cmp_genomic);
        Self {
            chr: chr.into(),
            loops,
        }
    }

    pub fn chr(&self) -> &str {
        &self.chr
    }

    pub fn loops(&self) -> &[LoopCall] {
        &self.loops
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoopCall> {
        self.loops.iter()
    }

    /// Number of calls contributed by each resolution tier, finest first.
    pub fn provenance_counts(&self) -> Vec<(ResType, usize)> {
        self.loops
            .iter()
            .filter_map(LoopCall::provenance)
            .counts()
            .into_iter()
            .sorted()
            .collect()
    }
}
