//! Value coercion against a column's logical type

use crate::catalog::{ColumnMeta, LogicalType};
use crate::error::{Error, Result};
use crate::types::{JsonValue, SqlValue};

/// Coerce one record value for `column`
///
/// - text into `int` parses as a base-10 integer
/// - text into `float` parses as a decimal float
/// - a fractional number into `int` fails; whole numbers narrow exactly
///
/// Every other combination passes through unchanged.
pub fn coerce(value: &JsonValue, column: &ColumnMeta) -> Result<SqlValue> {
    match (value, column.logical_type) {
        (JsonValue::String(s), LogicalType::Int) => s.parse::<i64>().map(SqlValue::Int).map_err(|e| {
            Error::coercion(&column.name, format!("cannot parse {s:?} as integer: {e}"))
        }),
        (JsonValue::String(s), LogicalType::Float) => parse_float(s).map(SqlValue::Float).map_err(|e| {
            Error::coercion(&column.name, format!("cannot parse {s:?} as float: {e}"))
        }),
        (JsonValue::Number(n), LogicalType::Int) if !n.is_i64() => {
            if n.is_u64() {
                return Err(Error::coercion(
                    &column.name,
                    format!("integer {n} is out of range"),
                ));
            }
            let v = n.as_f64().unwrap_or(f64::NAN);
            if v.fract() != 0.0 {
                return Err(Error::coercion(
                    &column.name,
                    format!("cannot convert number {v} to integer: fractional value present"),
                ));
            }
            number_to_int(v).ok_or_else(|| {
                Error::coercion(&column.name, format!("number {v} is out of integer range"))
            })
        }
        _ => Ok(SqlValue::from(value)),
    }
}

/// Parse decimal text, rejecting values that overflow to infinity
///
/// `inf`, `infinity` and `nan` spelled out are still accepted.
fn parse_float(s: &str) -> std::result::Result<f64, String> {
    let v = s.parse::<f64>().map_err(|e| e.to_string())?;
    let spelled = s.trim_start_matches(['+', '-']).chars().all(|c| c.is_ascii_alphabetic());
    if v.is_finite() || spelled {
        Ok(v)
    } else {
        Err("value out of range".to_string())
    }
}

/// Narrow a float to an integer only if no information is lost
fn number_to_int(v: f64) -> Option<SqlValue> {
    // i64::MAX is not representable as f64; 2^63 is the first value out of range
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if v.is_finite() && v >= -LIMIT && v < LIMIT {
        Some(SqlValue::Int(v as i64))
    } else {
        None
    }
}

/// Value used for a column a record does not carry
///
/// NULL for nullable columns, otherwise the zero value of the logical type.
/// Opaque columns have no zero value and get NULL either way.
pub fn fill_value(column: &ColumnMeta) -> SqlValue {
    if column.nullable {
        return SqlValue::Null;
    }
    match column.logical_type {
        LogicalType::String => SqlValue::String(String::new()),
        LogicalType::Int => SqlValue::Int(0),
        LogicalType::Float => SqlValue::Float(0.0),
        LogicalType::Other => SqlValue::Null,
    }
}
