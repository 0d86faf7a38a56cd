//! Value types flowing through the loop-calling pipeline.
//!
//! - [`InteractionRecord`]: a raw scored bin pair as produced by the upstream
//!   interaction-scoring model.
//! - [`LoopCall`]: a called loop (two anchor bins, score, resolution and an
//!   optional provenance resolution after merging).
//! - [`LoopSet`]: loop calls of one chromosome at one resolution.
//! - [`MergedLoopSet`]: the deduplicated result of cross-resolution merging.
//! - [`coords`]: conversion between bin indices and base-pair intervals.
//! - [`typedef`]: aliases for bin indices, positions, resolutions and scores.

pub mod coords;
mod interaction;
mod loop_call;
pub mod typedef;


pub use coords::{
    bin_to_interval,
    pos_to_bin,
    BinInterval,
};
pub use interaction::InteractionRecord;
pub use loop_call::{
    LoopCall,
    DEFAULT_COLOR,
    DEFAULT_NAME,
    LoopSet,
    MergedLoopSet,
};
