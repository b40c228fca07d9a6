//! Catalog query against `information_schema.columns`

use super::types::{ColumnMeta, ColumnSet, TableRef};
use crate::error::{Error, Result};
use duckdb::Connection;
use regex::Regex;
use std::sync::LazyLock;

static CAST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^cast\s*\(\s*(.+)\s+as\s+[^()]+(?:\([\d,\s]*\))?\s*\)$").unwrap()
});

static LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^
        \(?\s*
        (?:'(?:[^']|'')*' | [+-]?(?:\d+\.?\d*|\.\d+)(?:e[+-]?\d+)? | null | true | false)
        \s*\)?
        (?:\s*::\s*[a-z_][a-z0-9_\s]*(?:\([\d,\s]*\))?(?:\[\])?)*
        $",
    )
    .unwrap()
});

/// Check if a catalog default expression is a plain literal
///
/// Quoted strings, numbers, `NULL`/`TRUE`/`FALSE`, optionally wrapped in a
/// `CAST(.. AS type)` or followed by `::type` casts, count as literals.
/// Anything else (`nextval(..)`, `now()`, `CURRENT_TIMESTAMP`) is an
/// expression the database evaluates itself.
pub fn is_literal_default(expression: &str) -> bool {
    let trimmed = expression.trim();
    let inner = CAST_REGEX
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map_or(trimmed, |m| m.as_str().trim());
    LITERAL_REGEX.is_match(inner)
}

/// Fetch the column set of `table`
///
/// Columns come back in declaration order. Zero columns is an error: the
/// table is missing or the identifier resolved to the wrong schema.
pub fn fetch_columns(conn: &Connection, table: &TableRef) -> Result<ColumnSet> {
    let mut sql = String::from(
        "SELECT column_name, is_nullable, data_type, column_default \
         FROM information_schema.columns \
         WHERE table_schema = ? AND table_name = ?",
    );
    let mut params = vec![table.schema.clone(), table.table.clone()];
    if let Some(catalog) = &table.catalog {
        sql.push_str(" AND table_catalog = ?");
        params.push(catalog.clone());
    }
    sql.push_str(" ORDER BY ordinal_position");

    tracing::debug!("Fetching catalog for {}: {}", table, sql);

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::schema_query(table.qualified(), e.to_string()))?;

    let rows = stmt
        .query_map(duckdb::params_from_iter(params.iter()), |row| {
            let name: String = row.get(0)?;
            let is_nullable: String = row.get(1)?;
            let declared_type: String = row.get(2)?;
            let default: Option<String> = row.get(3)?;
            Ok(ColumnMeta::new(
                name,
                declared_type,
                is_nullable.eq_ignore_ascii_case("yes"),
                default,
            ))
        })
        .map_err(|e| Error::schema_query(table.qualified(), e.to_string()))?;

    let mut columns = ColumnSet::new();
    for row in rows {
        let column = row.map_err(|e| Error::schema_query(table.qualified(), e.to_string()))?;
        columns.push(column)?;
    }

    if columns.is_empty() {
        return Err(Error::SchemaNotFound {
            schema: table.schema.clone(),
            table: table.table.clone(),
        });
    }

    tracing::debug!("Catalog for {} has {} columns", table, columns.len());
    Ok(columns)
}
