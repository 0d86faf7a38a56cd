//! Utility functions and helper macros shared by the `hicloops` modules.
//!
//! - Scalar statistics with pinned, reproducible semantics (percentile with
//!   linear interpolation, truncated integer mean, decimal rounding).
//! - The crate-wide rayon [`THREAD_POOL`], sized by the
//!   `HICLOOPS_NUM_THREADS` environment variable.
//! - A macro for builder-style `with_*` setters.

use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};

mod stats;
pub use stats::*;

pub const THREADS_ENV_VAR: &str = "HICLOOPS_NUM_THREADS";

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var(THREADS_ENV_VAR)
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}
