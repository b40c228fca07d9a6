//! Destination connectivity via DuckDB
//!
//! This module opens the load destination using DuckDB as the engine.
//! DuckDB writes to PostgreSQL, MySQL and SQLite through its extensions.

mod engine;

pub use engine::{Destination, TARGET_CATALOG};
