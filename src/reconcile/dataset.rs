//! Lazy column discovery and row alignment

use super::coerce::{coerce, fill_value};
use super::mapping::{FieldMap, FieldTarget};
use crate::catalog::{ColumnMeta, ColumnSet};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, SqlValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Why a record key is not loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No catalog column matches the key
    NotInCatalog,
    /// The field mapping discards the key
    Discarded,
    /// The matching column is filled by a database default expression
    DatabaseDefault,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::NotInCatalog => write!(f, "not in catalog"),
            IgnoreReason::Discarded => write!(f, "discarded by mapping"),
            IgnoreReason::DatabaseDefault => write!(f, "filled by database default"),
        }
    }
}

/// Reconciles decoded records into rows aligned to one column order
///
/// One `DataSet` serves one load job and is used from a single thread.
/// Columns are discovered lazily as record keys first appear and the
/// column set only ever grows. When it grows, every row emitted before is
/// padded so all rows keep the width of the column set. That pad is
/// O(rows x new columns), which is fine for batches of tens of thousands
/// of rows since growth stops once every key has been seen.
#[derive(Debug, Clone)]
pub struct DataSet {
    /// Full catalog of the destination table
    catalog: ColumnSet,
    /// Optional renames and discards
    mapping: FieldMap,
    /// Discovered columns, in row order
    columns: ColumnSet,
    /// Record key -> index into `columns`
    bindings: HashMap<String, usize>,
    /// Keys resolved to nothing, memoized
    ignored: BTreeMap<String, IgnoreReason>,
    /// Emitted rows
    rows: Vec<Vec<SqlValue>>,
}

impl DataSet {
    /// Create a data set for a table with the given catalog
    pub fn new(catalog: ColumnSet) -> Self {
        Self {
            catalog,
            mapping: FieldMap::new(),
            columns: ColumnSet::new(),
            bindings: HashMap::new(),
            ignored: BTreeMap::new(),
            rows: Vec::new(),
        }
    }

    /// Set the field mapping
    #[must_use]
    pub fn with_mapping(mut self, mapping: FieldMap) -> Self {
        self.mapping = mapping;
        self
    }

    /// Reconcile one record and append its row
    ///
    /// A coercion failure rejects only this record; columns discovered from
    /// its keys are kept.
    pub fn add_row(&mut self, record: &JsonObject) -> Result<()> {
        let width = self.columns.len();
        for key in record.keys() {
            if !self.bindings.contains_key(key) && !self.ignored.contains_key(key) {
                self.resolve_key(key)?;
            }
        }
        if self.columns.len() > width {
            self.pad_rows();
        }

        let row = self.build_row(record)?;
        self.rows.push(row);
        Ok(())
    }

    /// Reconcile any serializable record
    ///
    /// The value must serialize to a JSON object; field names (including
    /// serde renames) are the record keys.
    pub fn add_typed<T: Serialize>(&mut self, record: &T) -> Result<()> {
        match serde_json::to_value(record)? {
            JsonValue::Object(map) => self.add_row(&map),
            other => Err(Error::Other(format!(
                "Typed record must serialize to an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Resolve a never-seen key against the catalog
    fn resolve_key(&mut self, key: &str) -> Result<()> {
        let target = match self.mapping.get(key) {
            Some(FieldTarget::Discard) => {
                self.ignore(key, IgnoreReason::Discarded);
                return Ok(());
            }
            Some(FieldTarget::Column(name)) => name.as_str(),
            None => key,
        };

        let Some(column) = self.catalog.find(target) else {
            self.ignore(key, IgnoreReason::NotInCatalog);
            return Ok(());
        };
        if column.has_expression_default() {
            self.ignore(key, IgnoreReason::DatabaseDefault);
            return Ok(());
        }

        // A second key naming the same column (case variant or rename)
        // shares the existing binding.
        if let Some(index) = self.columns.iter().position(|c| c.name == column.name) {
            self.bindings.insert(key.to_string(), index);
            return Ok(());
        }

        let column = column.clone().with_source_key(key);
        tracing::debug!(
            "Discovered column '{}' ({}) from key '{}'",
            column.name,
            column.logical_type,
            key
        );
        self.bindings.insert(key.to_string(), self.columns.len());
        self.columns.push(column)
    }

    fn ignore(&mut self, key: &str, reason: IgnoreReason) {
        tracing::trace!("Ignoring key '{}': {}", key, reason);
        self.ignored.insert(key.to_string(), reason);
    }

    /// Pad rows shorter than the current column set
    fn pad_rows(&mut self) {
        let width = self.columns.len();
        for row in &mut self.rows {
            for column in self.columns.iter().skip(row.len()) {
                row.push(fill_value(column));
            }
            debug_assert_eq!(row.len(), width);
        }
    }

    fn build_row(&self, record: &JsonObject) -> Result<Vec<SqlValue>> {
        let mut row: Vec<SqlValue> = self.columns.iter().map(fill_value).collect();
        for (key, value) in record {
            if let Some(&index) = self.bindings.get(key) {
                if let Some(column) = self.columns.at(index) {
                    row[index] = coerce(value, column)?;
                }
            }
        }
        Ok(row)
    }

    /// Discovered columns in row order
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Discovered column names in row order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.names()
    }

    /// The destination catalog this data set resolves against
    pub fn catalog(&self) -> &ColumnSet {
        &self.catalog
    }

    /// Keys that are never loaded, with the reason
    pub fn ignored(&self) -> &BTreeMap<String, IgnoreReason> {
        &self.ignored
    }

    /// Emitted rows
    pub fn rows(&self) -> &[Vec<SqlValue>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were emitted
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows concatenated end to end
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.rows.iter().flatten()
    }

    /// Consume the data set, keeping only its rows
    pub fn into_rows(self) -> Vec<Vec<SqlValue>> {
        self.rows
    }

    /// Column metadata for a record key, if it is bound
    pub fn column_for_key(&self, key: &str) -> Option<&ColumnMeta> {
        self.bindings.get(key).and_then(|&i| self.columns.at(i))
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
