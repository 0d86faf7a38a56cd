//! Loop calling and loop merging algorithms.
//!
//! - [`filter`]: two-stage [`ScoreFilter`] (distance from the diagonal, then
//!   an absolute or percentile-derived score cutoff).
//! - [`cluster`]: [`DensityClusterer`], which groups significant bin pairs
//!   with DBSCAN and reduces each cluster to a single loop call.
//! - [`caller`]: [`LoopCaller`], wiring filtering and optional clustering into
//!   a per-chromosome [`LoopSet`](crate::data_structs::LoopSet).
//! - [`merge`]: [`ResolutionMerger`], the greedy finest-first deduplication of
//!   loop sets called at different resolutions.
pub mod caller;
pub mod cluster;
pub mod dbscan;
pub mod filter;
pub mod merge;
pub mod spatial;

pub use caller::{
    CallConfig,
    CallStrategy,
    CallSummary,
    LoopCaller,
};
pub use cluster::DensityClusterer;
pub use filter::{
    FilterOutput,
    ScoreFilter,
    ThresholdMode,
};
pub use merge::ResolutionMerger;
