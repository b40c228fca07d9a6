//! Error types for batchload
//!
//! This module defines the error hierarchy for the whole loader.
//! Every variant carries the phase it failed in so operators can tell bad
//! data from a bad destination from a transient connectivity problem.

use thiserror::Error;

/// The main error type for batchload
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Undefined template variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Destination Errors
    // ============================================================================
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Schema query for '{table}' failed: {message}")]
    SchemaQuery { table: String, message: String },

    #[error("Schema not found or empty: {schema}.{table}")]
    SchemaNotFound { schema: String, table: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Cannot coerce value for column '{column}': {message}")]
    Coercion { column: String, message: String },

    #[error("Failed to decode record at line {line}: {message}")]
    Decode { line: usize, message: String },

    // ============================================================================
    // Batch Errors
    // ============================================================================
    #[error("Columns not provided")]
    ColumnsNotProvided,

    #[error("Row buffer of {values} values is not a multiple of {columns} columns")]
    MisalignedBuffer { values: usize, columns: usize },

    #[error("Batch loader already committed; create a new loader for the next load")]
    LoaderSpent,

    #[error("Delete statement failed: {message}")]
    Delete { message: String },

    #[error("Insert batch {batch}/{batches} failed: {message}")]
    InsertBatch {
        batch: usize,
        batches: usize,
        message: String,
    },

    #[error("Transaction error: {message}")]
    Transaction { message: String },

    #[error("Load cancelled during {phase}")]
    Cancelled { phase: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a schema query error
    pub fn schema_query(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaQuery {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a coercion error
    pub fn coercion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Coercion {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(line: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            line,
            message: message.into(),
        }
    }

    /// Create a delete error
    pub fn delete(message: impl Into<String>) -> Self {
        Self::Delete {
            message: message.into(),
        }
    }

    /// Create a transaction error
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(phase: impl Into<String>) -> Self {
        Self::Cancelled {
            phase: phase.into(),
        }
    }

    /// Stable name of the phase this error belongs to
    pub fn phase(&self) -> &'static str {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::UndefinedVariable { .. }
            | Error::YamlParse(_)
            | Error::JsonParse(_) => "config",
            Error::Connection { .. } => "connection",
            Error::SchemaQuery { .. } | Error::SchemaNotFound { .. } => "schema",
            Error::Coercion { .. } => "coercion",
            Error::Decode { .. } => "decode",
            Error::ColumnsNotProvided
            | Error::MisalignedBuffer { .. }
            | Error::LoaderSpent => "batch",
            Error::Delete { .. } => "delete",
            Error::InsertBatch { .. } => "insert",
            Error::Transaction { .. } => "transaction",
            Error::Cancelled { .. } => "cancelled",
            Error::Io(_) | Error::FileNotFound { .. } => "io",
            Error::Other(_) => "other",
        }
    }

    /// Check if this error is scoped to a single record
    ///
    /// Data errors leave the loader state intact, so a caller may skip the
    /// offending record and keep going.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::Coercion { .. } | Error::Decode { .. })
    }
}

/// Result type alias for batchload
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("table");
        assert_eq!(err.to_string(), "Missing required config field: table");

        let err = Error::InsertBatch {
            batch: 3,
            batches: 4,
            message: "constraint violated".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Insert batch 3/4 failed: constraint violated"
        );

        assert_eq!(Error::ColumnsNotProvided.to_string(), "Columns not provided");
    }

    #[test]
    fn test_phase_identity() {
        assert_eq!(Error::schema_query("t", "boom").phase(), "schema");
        assert_eq!(
            Error::SchemaNotFound {
                schema: "main".to_string(),
                table: "t".to_string()
            }
            .phase(),
            "schema"
        );
        assert_eq!(Error::coercion("id", "bad").phase(), "coercion");
        assert_eq!(Error::delete("bad").phase(), "delete");
        assert_eq!(Error::transaction("bad").phase(), "transaction");
        assert_eq!(Error::cancelled("insert").phase(), "cancelled");
    }

    #[test]
    fn test_is_data_error() {
        assert!(Error::coercion("id", "bad").is_data_error());
        assert!(Error::decode(3, "bad").is_data_error());

        assert!(!Error::ColumnsNotProvided.is_data_error());
        assert!(!Error::delete("bad").is_data_error());
        assert!(!Error::connection("down").is_data_error());
    }
}
