//! CLI module
//!
//! Command-line interface for running load jobs.
//!
//! # Commands
//!
//! - `load` - Load records into the destination table
//! - `schema` - Show the destination table's column catalog
//! - `check` - Test connection to the destination
//! - `tables` - List destination tables
//! - `validate` - Validate the job definition

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
