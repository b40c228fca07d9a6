//! Per-commit load statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one `BatchLoader::commit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// When the commit started
    #[serde(rename = "started")]
    pub started_at: DateTime<Utc>,
    /// Wall time of the commit
    #[serde(rename = "dur", with = "human_duration")]
    pub duration: Duration,
    /// Destination table
    pub table: String,
    /// Rows affected by the pre-load delete
    #[serde(rename = "removed")]
    pub rows_removed: usize,
    /// Rows handed to the loader
    #[serde(rename = "rows")]
    pub rows_submitted: usize,
    /// Rows the database reported as inserted
    #[serde(rename = "inserted")]
    pub rows_inserted: usize,
    /// Columns per row
    #[serde(rename = "cols")]
    pub column_count: usize,
}

impl LoadStats {
    pub(crate) fn new(table: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration: Duration::ZERO,
            table: table.into(),
            rows_removed: 0,
            rows_submitted: 0,
            rows_inserted: 0,
            column_count: 0,
        }
    }
}

impl std::fmt::Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} of {} rows inserted, {} removed, {} columns in {}",
            self.table,
            self.rows_inserted,
            self.rows_submitted,
            self.rows_removed,
            self.column_count,
            humantime::format_duration(self.duration)
        )
    }
}

/// `Duration` as a human-readable string such as `"1s 250ms"`
mod human_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
