//! Statement text generation

use crate::types::{Dialect, SqlValue};
use std::collections::BTreeMap;

/// Split `num_rows` into batch sizes of at most `max_batch_size`
///
/// Every batch but the last is exactly `max_batch_size` rows; the last one
/// holds the remainder. Zero rows or a zero limit yields no batches.
pub fn partition(num_rows: usize, max_batch_size: usize) -> Vec<usize> {
    if num_rows == 0 || max_batch_size == 0 {
        return Vec::new();
    }
    let mut sizes = vec![max_batch_size; num_rows / max_batch_size];
    let remainder = num_rows % max_batch_size;
    if remainder > 0 {
        sizes.push(remainder);
    }
    sizes
}

/// Build a multi-row parameterized INSERT for `num_rows` rows
///
/// `INSERT INTO t (a,b) VALUES ($1,$2),($3,$4);` for ordinal dialects,
/// `INSERT INTO t (a,b) VALUES (?,?),(?,?);` otherwise. Ordinal placeholders
/// are numbered continuously across the whole statement.
pub fn insert_template(
    table: &str,
    columns: &[String],
    num_rows: usize,
    dialect: Dialect,
) -> String {
    let width = columns.len();
    let mut sql = format!("INSERT INTO {} ({}) VALUES ", table, columns.join(","));
    for row in 0..num_rows {
        if row > 0 {
            sql.push(',');
        }
        sql.push('(');
        for col in 0..width {
            if col > 0 {
                sql.push(',');
            }
            sql.push_str(&dialect.placeholder(row * width + col + 1));
        }
        sql.push(')');
    }
    sql.push(';');
    sql
}

/// Build a DELETE matching every `column = value` pair in `filter`
///
/// Columns appear in sorted order so the same filter always produces the
/// same text. An empty filter deletes every row.
pub fn build_delete(
    table: &str,
    filter: &BTreeMap<String, SqlValue>,
    dialect: Dialect,
) -> (String, Vec<SqlValue>) {
    let mut sql = format!("DELETE FROM {table}");
    let mut params = Vec::with_capacity(filter.len());
    for (i, (column, value)) in filter.iter().enumerate() {
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        sql.push_str(column);
        sql.push_str(" = ");
        sql.push_str(&dialect.placeholder(i + 1));
        params.push(value.clone());
    }
    (sql, params)
}
