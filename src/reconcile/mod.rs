//! Record reconciliation module
//!
//! Aligns heterogeneous JSON records to one ordered column set discovered
//! from the destination catalog.
//!
//! # Overview
//!
//! The reconcile module provides:
//! - `DataSet` - Lazily discovers columns, coerces values and emits
//!   fixed-width rows, back-filling earlier rows when the column set grows
//! - `FieldMap` - Optional record key to column renames and discards
//! - `coerce` - Value coercion keyed on the column's logical type

mod coerce;
mod dataset;
mod mapping;

pub use coerce::{coerce, fill_value};
pub use dataset::{DataSet, IgnoreReason};
pub use mapping::{FieldMap, FieldTarget, DISCARD};
