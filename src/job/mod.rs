//! Load job definitions
//!
//! Parse load jobs from YAML files.
//!
//! # Overview
//!
//! The job module provides:
//! - `LoadJobDefinition` - destination, target table, mapping and policies
//! - `DestinationDef` - connection settings per engine
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_job, load_job_from_str, validate_job};
pub use types::{DeleteDef, DestinationDef, EngineKind, LoadJobDefinition};

#[cfg(test)]
mod tests;
