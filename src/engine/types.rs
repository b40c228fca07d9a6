//! Engine types
//!
//! Configuration and report types for the load engine.

use crate::batch::{LoadStats, DEFAULT_MAX_BATCH_SIZE};
use crate::job::{DeleteDef, LoadJobDefinition};
use crate::reconcile::{FieldMap, IgnoreReason};
use crate::types::{Dialect, OnError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Configuration for a load run
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Rows per INSERT statement
    pub max_batch_size: usize,
    /// Placeholder dialect
    pub dialect: Dialect,
    /// Bad record policy
    pub on_error: OnError,
    /// Record key to column mapping
    pub mapping: FieldMap,
    /// Pre-load delete
    pub delete: Option<DeleteDef>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            dialect: Dialect::default(),
            on_error: OnError::default(),
            mapping: FieldMap::new(),
            delete: None,
        }
    }
}

impl LoadConfig {
    /// Create a new load config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every setting from a job definition
    pub fn from_job(job: &LoadJobDefinition) -> Self {
        Self {
            max_batch_size: job.max_batch_size,
            dialect: job.dialect(),
            on_error: job.on_error,
            mapping: job.mapping.clone(),
            delete: job.delete.clone(),
        }
    }

    /// Set batch size
    #[must_use]
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Set placeholder dialect
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set bad record policy
    #[must_use]
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Set field mapping
    #[must_use]
    pub fn with_mapping(mut self, mapping: FieldMap) -> Self {
        self.mapping = mapping;
        self
    }

    /// Set pre-load delete
    #[must_use]
    pub fn with_delete(mut self, delete: DeleteDef) -> Self {
        self.delete = Some(delete);
        self
    }
}

/// Outcome of a load run
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Commit statistics
    #[serde(flatten)]
    pub stats: LoadStats,
    /// Records read from the source, including skipped ones
    pub records: usize,
    /// Records skipped under `on_error: skip`
    pub skipped: usize,
    /// Loaded columns in statement order
    pub columns: Vec<String>,
    /// Record keys that were never loaded
    pub ignored_keys: BTreeMap<String, IgnoreReason>,
}
