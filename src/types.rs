//! Common types used throughout batchload
//!
//! This module contains the value model bound into statements, the SQL
//! dialect switch and a few shared aliases.

use duckdb::types::{ToSqlOutput, Value as DuckValue, ValueRef};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, the shape of one decoded record
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// SQL Values
// ============================================================================

/// A single value bound into an INSERT or DELETE statement
///
/// This is a closed set: every record value is turned into one of these
/// before it reaches the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<&JsonValue> for SqlValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => SqlValue::Null,
            JsonValue::Bool(b) => SqlValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Int(i),
                None => SqlValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => SqlValue::String(s.clone()),
            // Nested documents are stored as their compact JSON text
            JsonValue::Array(_) | JsonValue::Object(_) => SqlValue::String(value.to_string()),
        }
    }
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::String(s) => SqlValue::String(s),
            other => SqlValue::from(&other),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl duckdb::ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(DuckValue::Null),
            SqlValue::Bool(b) => ToSqlOutput::Owned(DuckValue::Boolean(*b)),
            SqlValue::Int(i) => ToSqlOutput::Owned(DuckValue::BigInt(*i)),
            SqlValue::Float(v) => ToSqlOutput::Owned(DuckValue::Double(*v)),
            SqlValue::String(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

// ============================================================================
// Dialect
// ============================================================================

/// SQL dialect of the destination
///
/// Decides placeholder syntax and the schema an unqualified table name
/// resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Ordinal `$1, $2, ...` placeholders, `public` default schema
    Postgres,
    /// Generic `?` placeholders
    Mysql,
    /// Generic `?` placeholders, `main` default schema
    Sqlite,
    /// Generic `?` placeholders, `main` default schema
    #[default]
    Duckdb,
}

impl Dialect {
    /// Check if this dialect numbers its placeholders
    pub fn is_ordinal(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Placeholder text for the 1-based parameter `index`
    pub fn placeholder(self, index: usize) -> String {
        if self.is_ordinal() {
            format!("${index}")
        } else {
            "?".to_string()
        }
    }

    /// Schema an unqualified table name resolves to
    pub fn default_schema(self) -> &'static str {
        match self {
            Dialect::Postgres => "public",
            Dialect::Mysql | Dialect::Sqlite | Dialect::Duckdb => "main",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Mysql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::Duckdb => write!(f, "duckdb"),
        }
    }
}

// ============================================================================
// Error Strategy
// ============================================================================

/// What to do with a record that fails coercion or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    /// Stop the whole load on the first bad record
    #[default]
    Abort,
    /// Log the bad record and continue
    Skip,
}
