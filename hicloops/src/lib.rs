//! # hicloops
//!
//! `hicloops` turns per-bin-pair interaction scores of a chromatin contact
//! map into a clean set of loop calls and consolidates loop calls made at
//! several resolutions into one deduplicated set.
//!
//! ## Pipeline
//!
//! 1. [`ScoreFilter`](tools::ScoreFilter) drops records close to the diagonal
//!    and keeps those at or above an absolute or percentile-derived cutoff.
//! 2. Optionally, [`DensityClusterer`](tools::DensityClusterer) groups the
//!    surviving bin pairs with DBSCAN and reports one loop per cluster.
//! 3. Calls are converted to base pairs and written as BEDPE, one file per
//!    resolution.
//! 4. [`ResolutionMerger`](tools::ResolutionMerger) merges the per-resolution
//!    sets finest first, dropping coarse calls whose centroid lies within a
//!    tolerance of an already accepted call.
//!
//! One chromosome is processed per call. Independent chromosomes may be run
//! in parallel with [`LoopCaller::call_many`](tools::LoopCaller::call_many);
//! the number of threads is read from the `HICLOOPS_NUM_THREADS` environment
//! variable.
//!
//! ## Usage
//!
//! ```no_run
//! use std::fs::File;
//! use hicloops::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let records = read_interactions(File::open("chr1.deeploop.txt")?)?;
//!     let caller = LoopCaller::new(
//!         CallConfig::default()
//!             .with_resolution(5000)
//!             .with_strategy(CallStrategy::Percentile(98.0)),
//!     );
//!     let (loops_5k, _summary) = caller.call("chr1", &records)?;
//!     write_loop_set(File::create("chr1.5k.bedpe")?, &loops_5k)?;
//!
//!     let tiers = read_tiers(&["chr1.5k.bedpe", "chr1.10k.bedpe"], &[5000, 10_000])?;
//!     let merged = ResolutionMerger::new(20_000).merge(tiers)?;
//!     write_merged(File::create("chr1.merged.bedpe")?, &merged)?;
//!     Ok(())
//! }
//! ```

pub mod data_structs;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;
