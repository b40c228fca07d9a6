//! Template interpolation for destination settings
//!
//! Handles `{{ variable }}` interpolation in job connection settings so
//! secrets can stay out of job files. `{{ env.NAME }}` reads an environment
//! variable; `{{ config.key }}` (or bare `{{ key }}`) reads the JSON config
//! passed on the command line, with nested access like `{{ config.pg.host }}`.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Values available to templates
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Job configuration values
    pub config: JsonValue,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with config values
    pub fn with_config(config: JsonValue) -> Self {
        Self { config }
    }

    /// Resolve a variable path to its text
    pub fn get(&self, path: &str) -> Option<String> {
        let parts: Vec<&str> = path.split('.').collect();
        match parts.as_slice() {
            ["env", name] => std::env::var(name).ok(),
            ["config", rest @ ..] if !rest.is_empty() => {
                get_nested_value(&self.config, rest).map(value_to_string)
            }
            _ => get_nested_value(&self.config, &parts).map(value_to_string),
        }
    }
}

/// Get a nested value from a JSON value by path
fn get_nested_value<'a>(value: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    let mut current = value;
    for part in path {
        match current {
            JsonValue::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut undefined = Vec::new();
    let rendered = TEMPLATE_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let path = &cap[1];
        ctx.get(path).unwrap_or_else(|| {
            undefined.push(path.to_string());
            String::new()
        })
    });

    if undefined.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::UndefinedVariable {
            name: undefined.join(", "),
        })
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        _ => value.to_string(),
    }
}
