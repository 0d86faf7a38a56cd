//! File adapters around the core algorithms.
//!
//! - [`interactions`]: scored bin pairs (`bin1 bin2 score`).
//! - [`bedpe`]: per-resolution and merged loop sets as BEDPE.
//! - [`juicer`]: Juicer dump joining and anchor reference BED generation.
pub mod bedpe;
pub mod interactions;
pub mod juicer;

pub use bedpe::{
    read_loop_set,
    read_tiers,
    write_loop_set,
    write_loop_set_file,
    write_merged,
    write_merged_file,
    BedpeRecord,
    BedpeWriter,
};
pub use interactions::{
    read_interactions,
    read_interactions_file,
};
