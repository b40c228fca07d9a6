//! Tests for load job definitions

use super::*;
use crate::error::Error;
use crate::reconcile::FieldTarget;
use crate::types::{Dialect, OnError, SqlValue};
use pretty_assertions::assert_eq;
use std::io::Write;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_job() {
    let yaml = r#"
name: orders-load
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
"#;

    let def = load_job_from_str(yaml).unwrap();
    assert_eq!(def.name, "orders-load");
    assert_eq!(def.table, "orders");
    assert_eq!(def.destination.engine, EngineKind::Duckdb);
    assert_eq!(def.max_batch_size, 200);
    assert_eq!(def.on_error, OnError::Abort);
    assert_eq!(def.dialect(), Dialect::Duckdb);
    assert!(def.mapping.is_empty());
    assert!(def.delete.is_none());
}

#[test]
fn test_load_full_job() {
    let yaml = r#"
name: orders-load
destination:
  engine: postgres
  connection_string: "postgresql://loader:{{ env.PGPASSWORD }}@db.internal:5433/sales"
  schema: staging
table: sales.orders
max_batch_size: 500
mapping:
  orderId: id
  debug_blob: "-"
delete:
  where:
    region: eu
    day: "2024-01-01"
on_error: skip
"#;

    let def = load_job_from_str(yaml).unwrap();
    assert_eq!(def.destination.engine, EngineKind::Postgres);
    assert_eq!(def.destination.default_schema(), "staging");
    assert_eq!(def.max_batch_size, 500);
    assert_eq!(def.on_error, OnError::Skip);
    assert_eq!(def.dialect(), Dialect::Postgres);
    assert_eq!(
        def.mapping.get("orderId"),
        Some(&FieldTarget::Column("id".to_string()))
    );
    assert_eq!(def.mapping.get("debug_blob"), Some(&FieldTarget::Discard));

    let delete = def.delete.unwrap();
    assert!(!delete.truncate);
    let filter = delete.filter_values();
    assert_eq!(
        filter.keys().collect::<Vec<_>>(),
        vec!["day", "region"]
    );
    assert_eq!(filter["region"], SqlValue::from("eu"));
}

#[test]
fn test_dialect_override() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ./warehouse.duckdb
table: orders
dialect: postgres
"#;

    let def = load_job_from_str(yaml).unwrap();
    assert_eq!(def.dialect(), Dialect::Postgres);
    assert_eq!(def.destination.default_schema(), "main");
}

#[test]
fn test_truncate_delete() {
    let yaml = r#"
name: j
destination:
  engine: sqlite
  database: ./local.db
table: orders
delete:
  truncate: true
"#;

    let def = load_job_from_str(yaml).unwrap();
    assert_eq!(def.destination.connection_string, "./local.db");
    let delete = def.delete.unwrap();
    assert!(delete.truncate);
    assert!(delete.filter.is_empty());
}

#[test]
fn test_load_job_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name: j\ndestination:\n  engine: duckdb\n  connection_string: \":memory:\"\ntable: t"
    )
    .unwrap();

    let def = load_job(file.path()).unwrap();
    assert_eq!(def.table, "t");
}

#[test]
fn test_load_job_missing_file() {
    let err = load_job("/nonexistent/job.yaml").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_empty_name_rejected() {
    let yaml = r#"
name: ""
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
"#;
    assert!(load_job_from_str(yaml).is_err());
}

#[test]
fn test_empty_table_rejected() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ":memory:"
table: " "
"#;
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "table"));
}

#[test]
fn test_destination_needs_connection_string() {
    let yaml = r#"
name: j
destination:
  engine: mysql
table: orders
"#;
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(matches!(err, Error::YamlParse(_)), "{err}");
    assert_eq!(err.phase(), "config");
}

#[test]
fn test_server_engine_rejects_bare_name() {
    let yaml = r#"
name: j
destination:
  engine: mysql
  connection_string: warehouse
table: orders
"#;
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("mysql"), "{err}");
}

#[test]
fn test_file_engine_needs_path() {
    let yaml = r#"
name: j
destination:
  engine: sqlite
  path: " "
table: orders
"#;
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }), "{err}");
}

#[test]
fn test_delete_both_where_and_truncate_rejected() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
delete:
  truncate: true
  where:
    region: eu
"#;
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("both"), "{err}");
}

#[test]
fn test_empty_delete_rejected() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
delete: {}
"#;
    assert!(load_job_from_str(yaml).is_err());
}

#[test]
fn test_nested_delete_value_rejected() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
delete:
  where:
    region: [eu, us]
"#;
    assert!(load_job_from_str(yaml).is_err());
}

#[test]
fn test_empty_mapping_target_rejected() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
mapping:
  orderId: ""
"#;
    let err = load_job_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("orderId"), "{err}");
}

#[test]
fn test_zero_batch_size_is_accepted() {
    let yaml = r#"
name: j
destination:
  engine: duckdb
  connection_string: ":memory:"
table: orders
max_batch_size: 0
"#;
    assert_eq!(load_job_from_str(yaml).unwrap().max_batch_size, 0);
}

#[test]
fn test_unknown_engine_rejected() {
    let yaml = r#"
name: j
destination:
  engine: oracle
table: orders
"#;
    assert!(load_job_from_str(yaml).is_err());
}
