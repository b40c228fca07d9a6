//! Load engine module
//!
//! Main load loop: source, reconciliation, batch commit.
//!
//! # Overview
//!
//! The engine module provides:
//! - `LoadEngine` - Runs one load job against an open destination
//! - `LoadConfig` - Batch size, dialect, mapping and bad record policy
//! - `LoadReport` - Commit statistics plus reconciliation details

mod types;

pub use types::{LoadConfig, LoadReport};

use crate::batch::{build_delete, BatchLoader, LoadStats};
use crate::database::Destination;
use crate::decode::RecordSource;
use crate::error::{Error, Result};
use crate::job::LoadJobDefinition;
use crate::reconcile::DataSet;
use crate::template::TemplateContext;
use crate::types::OnError;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Load engine for one destination table
#[derive(Debug)]
pub struct LoadEngine {
    /// Open destination
    destination: Destination,
    /// Table identifier as configured
    table: String,
    /// Load configuration
    config: LoadConfig,
}

impl LoadEngine {
    /// Create a new load engine
    pub fn new(destination: Destination, table: impl Into<String>) -> Self {
        Self {
            destination,
            table: table.into(),
            config: LoadConfig::default(),
        }
    }

    /// Open the destination of a job and configure the engine from it
    pub fn from_job(job: &LoadJobDefinition, context: &TemplateContext) -> Result<Self> {
        let destination = Destination::open(&job.destination, context)?;
        Ok(Self::new(destination, &job.table).with_config(LoadConfig::from_job(job)))
    }

    /// Set load configuration
    #[must_use]
    pub fn with_config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the load configuration
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Get the destination
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Give the destination back
    pub fn into_destination(self) -> Destination {
        self.destination
    }

    /// Load every record of `source` in one transaction
    ///
    /// The catalog is fetched first; a missing table fails before any record
    /// is read. Bad records abort the run or are skipped, per `on_error`.
    /// Nothing is written unless every record was read and the commit
    /// succeeded.
    pub fn run(
        &mut self,
        source: &mut dyn RecordSource,
        cancel: &CancellationToken,
    ) -> Result<LoadReport> {
        let table = self.destination.resolve_table(&self.table)?;
        let catalog = self.destination.fetch_columns(&table)?;
        let qualified = table.qualified();
        tracing::info!(
            "Loading into {} ({} catalog columns, batch size {})",
            qualified,
            catalog.len(),
            self.config.max_batch_size
        );

        let mut dataset = DataSet::new(catalog).with_mapping(self.config.mapping.clone());
        let mut records = 0;
        let mut skipped = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::cancelled("read"));
            }
            let outcome = match source.next_record() {
                Ok(Some(record)) => {
                    records += 1;
                    dataset.add_row(&record)
                }
                Ok(None) => break,
                Err(e) => {
                    records += 1;
                    Err(e)
                }
            };

            if let Err(e) = outcome {
                if e.is_data_error() && self.config.on_error == OnError::Skip {
                    tracing::warn!("Skipping record {}: {}", source.position(), e);
                    skipped += 1;
                    continue;
                }
                tracing::error!("Record {} rejected: {}", source.position(), e);
                return Err(e);
            }
        }

        let columns = dataset.column_names();
        let ignored_keys = dataset.ignored().clone();
        for (key, reason) in &ignored_keys {
            tracing::debug!("Key '{}' not loaded: {}", key, reason);
        }

        if dataset.is_empty() {
            tracing::warn!("No records to load into {}; nothing written", qualified);
            return Ok(LoadReport {
                stats: LoadStats::new(qualified, Utc::now()),
                records,
                skipped,
                columns,
                ignored_keys,
            });
        }

        let loader = BatchLoader::new()
            .with_max_batch_size(self.config.max_batch_size)
            .with_dialect(self.config.dialect);

        if let Some(delete) = &self.config.delete {
            let filter = if delete.truncate {
                BTreeMap::new()
            } else {
                delete.filter_values()
            };
            let (sql, params) = build_delete(&qualified, &filter, self.config.dialect);
            loader.delete(sql, params)?;
        }

        for row in dataset.into_rows() {
            loader.add_row(row)?;
        }

        let stats = loader.commit(
            self.destination.connection_mut(),
            cancel,
            &qualified,
            &columns,
        )?;

        if skipped > 0 {
            tracing::warn!("{} of {} records skipped", skipped, records);
        }

        Ok(LoadReport {
            stats,
            records,
            skipped,
            columns,
            ignored_keys,
        })
    }
}
