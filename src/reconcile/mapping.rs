//! Field-name mapping from record keys to catalog columns

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping value that drops a record key instead of loading it
pub const DISCARD: &str = "-";

/// Where a record key goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldTarget {
    /// Load into the named column
    Column(String),
    /// Never load this key
    Discard,
}

impl From<String> for FieldTarget {
    fn from(value: String) -> Self {
        if value.trim() == DISCARD {
            FieldTarget::Discard
        } else {
            FieldTarget::Column(value)
        }
    }
}

impl From<&str> for FieldTarget {
    fn from(value: &str) -> Self {
        FieldTarget::from(value.to_string())
    }
}

impl From<FieldTarget> for String {
    fn from(value: FieldTarget) -> Self {
        match value {
            FieldTarget::Column(name) => name,
            FieldTarget::Discard => DISCARD.to_string(),
        }
    }
}

/// Record key to column mapping
///
/// Keys absent from the map load into the column of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    fields: HashMap<String, FieldTarget>,
}

impl FieldMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `key` to `target`
    pub fn insert(&mut self, key: impl Into<String>, target: impl Into<FieldTarget>) {
        self.fields.insert(key.into(), target.into());
    }

    /// Builder form of `insert`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, target: impl Into<FieldTarget>) -> Self {
        self.insert(key, target);
        self
    }

    /// Look up the target for a record key
    pub fn get(&self, key: &str) -> Option<&FieldTarget> {
        self.fields.get(key)
    }

    /// Number of mapped keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate mapped keys and targets
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldTarget)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, T: Into<FieldTarget>> FromIterator<(K, T)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (key, target) in iter {
            map.insert(key, target);
        }
        map
    }
}
