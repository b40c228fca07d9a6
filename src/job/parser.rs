//! YAML parser for load job definitions
//!
//! Parses and validates load job YAML files.

use crate::error::{Error, Result};
use crate::job::types::{DeleteDef, DestinationDef, LoadJobDefinition};
use crate::reconcile::FieldTarget;
use std::fs;
use std::path::Path;

/// Load a job definition from a YAML file
pub fn load_job(path: impl AsRef<Path>) -> Result<LoadJobDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read job file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_job_from_str(&content)
}

/// Load a job definition from a YAML string
pub fn load_job_from_str(yaml: &str) -> Result<LoadJobDefinition> {
    let def: LoadJobDefinition = serde_yaml::from_str(yaml)?;

    validate_job(&def)?;
    Ok(def)
}

/// Validate a job definition
pub fn validate_job(def: &LoadJobDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::config("Job name cannot be empty"));
    }

    if def.table.trim().is_empty() {
        return Err(Error::missing_field("table"));
    }

    validate_destination(&def.destination)?;

    for (key, target) in def.mapping.iter() {
        if key.is_empty() {
            return Err(Error::config("Mapping keys cannot be empty"));
        }
        if let FieldTarget::Column(column) = target {
            if column.trim().is_empty() {
                return Err(Error::config(format!(
                    "Mapping for '{key}' has an empty column name; use \"-\" to discard"
                )));
            }
        }
    }

    if let Some(delete) = &def.delete {
        validate_delete(delete)?;
    }

    if def.max_batch_size == 0 {
        tracing::warn!(
            "Job '{}' has max_batch_size 0; commits will insert nothing",
            def.name
        );
    }

    Ok(())
}

/// Validate destination connection settings
fn validate_destination(dest: &DestinationDef) -> Result<()> {
    if dest.connection_string.trim().is_empty() {
        return Err(Error::missing_field("destination.connection_string"));
    }

    if dest.engine.is_server() && !dest.connection_string.contains(['=', '/']) {
        return Err(Error::config(format!(
            "Destination engine '{}' needs a connection URL or key=value string, got '{}'",
            dest.engine, dest.connection_string
        )));
    }

    if dest.schema.as_ref().is_some_and(|s| s.trim().is_empty()) {
        return Err(Error::config("destination.schema cannot be empty"));
    }

    Ok(())
}

/// Validate the pre-load delete
fn validate_delete(delete: &DeleteDef) -> Result<()> {
    match (delete.truncate, delete.filter.is_empty()) {
        (true, false) => Err(Error::config(
            "delete cannot set both 'where' and 'truncate'",
        )),
        (false, true) => Err(Error::config(
            "delete needs a non-empty 'where' or 'truncate: true'",
        )),
        _ => {
            if let Some((column, _)) = delete
                .filter
                .iter()
                .find(|(_, v)| v.is_array() || v.is_object())
            {
                return Err(Error::config(format!(
                    "delete filter for '{column}' must be a scalar value"
                )));
            }
            Ok(())
        }
    }
}
