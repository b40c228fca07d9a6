//! Transactional batch loading
//!
//! This module accumulates fixed-width rows, splits them into bounded
//! multi-row INSERT statements and executes an optional DELETE plus every
//! INSERT inside one transaction.

mod loader;
mod sql;
mod stats;

pub use loader::{BatchLoader, LoaderPhase, DEFAULT_MAX_BATCH_SIZE};
pub use sql::{build_delete, insert_template, partition};
pub use stats::LoadStats;
