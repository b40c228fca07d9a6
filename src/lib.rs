// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # batchload
//!
//! Schema-reconciling, transactional batch loader for relational tables.
//!
//! ## Features
//!
//! - **Schema Catalog**: Reads column names, types, nullability and defaults
//!   from `information_schema`
//! - **Record Reconciliation**: Maps loosely-typed JSON records onto the
//!   catalog, discovering columns lazily and coercing values
//! - **Batched Commit**: Multi-row parameterized INSERTs, an optional
//!   pre-load DELETE, all in one transaction
//! - **Destinations**: PostgreSQL, MySQL, SQLite and DuckDB via DuckDB
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use batchload::{load_job, LoadEngine, JsonlSource, TemplateContext};
//! use tokio_util::sync::CancellationToken;
//!
//! let job = load_job("jobs/orders.yaml")?;
//! let mut engine = LoadEngine::from_job(&job, &TemplateContext::new())?;
//!
//! let file = std::io::BufReader::new(std::fs::File::open("orders.jsonl")?);
//! let report = engine.run(&mut JsonlSource::new(file), &CancellationToken::new())?;
//! println!("{}", report.stats);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          LoadEngine                             │
//! │  RecordSource → DataSet → BatchLoader → commit() → LoadReport   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────────┼────────────────┬────────────────┐
//! │  Decode    │    Catalog      │   Reconcile    │     Batch      │
//! ├────────────┼─────────────────┼────────────────┼────────────────┤
//! │ JSONL      │ ColumnMeta      │ FieldMap       │ partition      │
//! │ JSON array │ LogicalType     │ coerce         │ INSERT template│
//! │ Memory     │ TableRef        │ lazy discovery │ DELETE         │
//! │            │ defaults        │ row padding    │ transaction    │
//! └────────────┴─────────────────┴────────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the loader
pub mod error;

/// Common types and type aliases
pub mod types;

/// Destination table column catalog
pub mod catalog;

/// Record to row reconciliation
pub mod reconcile;

/// Batched transactional commit
pub mod batch;

/// Destination connectivity via DuckDB
pub mod database;

/// Record sources (JSONL, JSON)
pub mod decode;

/// YAML load job definitions
pub mod job;

/// Main load engine
pub mod engine;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use batch::{BatchLoader, LoadStats};
pub use catalog::{ColumnMeta, ColumnSet, LogicalType, TableRef};
pub use database::Destination;
pub use decode::{JsonArraySource, JsonlSource, MemorySource, RecordSource};
pub use engine::{LoadConfig, LoadEngine, LoadReport};
pub use job::{load_job, load_job_from_str, LoadJobDefinition};
pub use reconcile::{DataSet, FieldMap, IgnoreReason};
pub use template::TemplateContext;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
