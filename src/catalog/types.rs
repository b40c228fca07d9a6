//! Catalog types

use crate::error::{Error, Result};
use crate::types::Dialect;
use serde::{Deserialize, Serialize};

/// Coarse type used to coerce record values before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    String,
    Int,
    Float,
    /// Opaque; values are never coerced
    Other,
}

impl LogicalType {
    /// Derive the logical type from a database-declared type string
    ///
    /// Matching is by case-insensitive substring, checked in the order
    /// string, int, float.
    pub fn from_declared(declared: &str) -> Self {
        let declared = declared.to_ascii_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|n| declared.contains(n));

        if contains_any(&["char", "text"]) {
            LogicalType::String
        } else if contains_any(&["int", "serial"]) {
            LogicalType::Int
        } else if contains_any(&["numeric", "dec", "double", "real", "fixed", "float"]) {
            LogicalType::Float
        } else {
            LogicalType::Other
        }
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalType::String => write!(f, "string"),
            LogicalType::Int => write!(f, "int"),
            LogicalType::Float => write!(f, "float"),
            LogicalType::Other => write!(f, "other"),
        }
    }
}

/// Metadata for one destination column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name as declared in the catalog
    pub name: String,
    /// Declared type string (e.g. `VARCHAR`, `numeric(10,2)`)
    pub declared_type: String,
    /// Coercion target derived from `declared_type`
    pub logical_type: LogicalType,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Default expression, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Record key this column is read from
    pub source_key: String,
}

impl ColumnMeta {
    /// Create column metadata; the source key starts out equal to the name
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        nullable: bool,
        default: Option<String>,
    ) -> Self {
        let name = name.into();
        let declared_type = declared_type.into();
        Self {
            source_key: name.clone(),
            logical_type: LogicalType::from_declared(&declared_type),
            name,
            declared_type,
            nullable,
            default,
        }
    }

    /// Bind this column to a record key
    #[must_use]
    pub fn with_source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = key.into();
        self
    }

    /// Check if the database populates this column from an expression
    ///
    /// Such columns (sequences, `now()`, generated values) never appear in
    /// an INSERT column list.
    pub fn has_expression_default(&self) -> bool {
        self.default
            .as_deref()
            .is_some_and(|d| !super::fetch::is_literal_default(d))
    }
}

/// Ordered column list, unique by name
///
/// Order is the row-alignment contract: every row built against this set
/// places its values in exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: Vec<ColumnMeta>,
}

impl ColumnSet {
    /// Create an empty column set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; fails if a column with the same name exists
    pub fn push(&mut self, column: ColumnMeta) -> Result<()> {
        if self.contains(&column.name) {
            return Err(Error::Other(format!(
                "Duplicate column '{}' in column set",
                column.name
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Get a column by exact name
    pub fn get(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column by name, falling back to an ASCII case-insensitive match
    pub fn find(&self, name: &str) -> Option<&ColumnMeta> {
        self.get(name).or_else(|| {
            self.columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
        })
    }

    /// Check if a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate columns in order
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnMeta> {
        self.columns.iter()
    }

    /// Column at `index`
    pub fn at(&self, index: usize) -> Option<&ColumnMeta> {
        self.columns.get(index)
    }

    /// Column names in order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

impl FromIterator<ColumnMeta> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = ColumnMeta>>(iter: I) -> Self {
        let mut set = ColumnSet::new();
        for column in iter {
            // Later duplicates lose; the catalog never returns any
            let _ = set.push(column);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a ColumnMeta;
    type IntoIter = std::slice::Iter<'a, ColumnMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// A resolved table identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Attached database (catalog) name, if the table lives in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Schema name
    pub schema: String,
    /// Table name
    pub table: String,
}

impl TableRef {
    /// Parse `table`, `schema.table` or `catalog.schema.table`
    ///
    /// Unqualified names resolve to `default_schema`.
    pub fn parse(identifier: &str, default_schema: &str) -> Result<Self> {
        let parts: Vec<&str> = identifier.trim().split('.').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::config(format!(
                "Invalid table identifier: '{identifier}'"
            )));
        }

        let owned = |s: &str| s.trim().to_string();
        match parts.as_slice() {
            [table] => Ok(Self {
                catalog: None,
                schema: default_schema.to_string(),
                table: owned(table),
            }),
            [schema, table] => Ok(Self {
                catalog: None,
                schema: owned(schema),
                table: owned(table),
            }),
            [catalog, schema, table] => Ok(Self {
                catalog: Some(owned(catalog)),
                schema: owned(schema),
                table: owned(table),
            }),
            _ => Err(Error::config(format!(
                "Invalid table identifier: '{identifier}'"
            ))),
        }
    }

    /// Parse using the dialect's default schema
    pub fn resolve(identifier: &str, dialect: Dialect) -> Result<Self> {
        Self::parse(identifier, dialect.default_schema())
    }

    /// Place this table inside an attached catalog
    #[must_use]
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Fully qualified name used in generated statements
    pub fn qualified(&self) -> String {
        match &self.catalog {
            Some(catalog) => format!("{catalog}.{}.{}", self.schema, self.table),
            None => format!("{}.{}", self.schema, self.table),
        }
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified())
    }
}
