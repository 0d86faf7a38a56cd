/// Index of a fixed-width genomic bin at a given resolution.
pub type BinIdx = u32;
/// Base-pair coordinate.
pub type PosType = u64;
/// Bin width in base pairs.
pub type ResType = u64;
pub type ScoreType = f64;
