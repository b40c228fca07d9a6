//! Schema catalog module
//!
//! Reads a destination table's column layout from the database's
//! `information_schema` and derives a coarse coercion type per column.
//!
//! # Overview
//!
//! The catalog module provides:
//! - `TableRef` - A resolved `catalog.schema.table` identifier
//! - `ColumnMeta` / `ColumnSet` - Ordered column metadata, unique by name
//! - `LogicalType` - The `string` / `int` / `float` / `other` coercion target
//! - `fetch_columns` - The read-only catalog query

mod fetch;
mod types;

pub use fetch::{fetch_columns, is_literal_default};
pub use types::{ColumnMeta, ColumnSet, LogicalType, TableRef};
