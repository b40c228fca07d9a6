//! Batch loader state machine and transactional commit

use super::sql::{insert_template, partition};
use super::stats::LoadStats;
use crate::error::{Error, Result};
use crate::types::{Dialect, SqlValue};
use chrono::Utc;
use duckdb::{params_from_iter, Connection, Transaction};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default number of rows per INSERT statement
pub const DEFAULT_MAX_BATCH_SIZE: usize = 200;

/// Lifecycle of a loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    /// Rows and a delete may still be added
    Accumulating,
    /// A commit is running
    Committing,
    /// A commit finished, successfully or not; the loader takes no more rows
    Spent,
}

impl std::fmt::Display for LoaderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderPhase::Accumulating => write!(f, "accumulating"),
            LoaderPhase::Committing => write!(f, "committing"),
            LoaderPhase::Spent => write!(f, "spent"),
        }
    }
}

#[derive(Debug, Clone)]
struct DeleteStatement {
    sql: String,
    params: Vec<SqlValue>,
}

#[derive(Debug)]
struct PendingBatch {
    phase: LoaderPhase,
    /// Rows concatenated end to end
    values: Vec<SqlValue>,
    delete: Option<DeleteStatement>,
}

/// Accumulates rows and loads them in one transaction
///
/// `add_row` and `delete` may be called from many threads. `commit` holds
/// the same lock for its whole run, so rows added concurrently wait behind
/// it and then fail with [`Error::LoaderSpent`]. All rows of one logical
/// load must be added before `commit` is called.
#[derive(Debug)]
pub struct BatchLoader {
    dialect: Dialect,
    max_batch_size: usize,
    state: Mutex<PendingBatch>,
    /// INSERT batches executed by the running commit
    batches_done: AtomicUsize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchLoader {
    /// Create a loader with the default batch size and `?` placeholders
    pub fn new() -> Self {
        Self {
            dialect: Dialect::default(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            state: Mutex::new(PendingBatch {
                phase: LoaderPhase::Accumulating,
                values: Vec::new(),
                delete: None,
            }),
            batches_done: AtomicUsize::new(0),
        }
    }

    /// Set the maximum rows per INSERT
    ///
    /// Zero is accepted and makes `commit` a no-op that inserts nothing.
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Set the placeholder dialect
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> LoaderPhase {
        self.lock().phase
    }

    /// Number of buffered values
    pub fn pending_values(&self) -> usize {
        self.lock().values.len()
    }

    /// INSERT batches executed so far by `commit`
    ///
    /// Readable without waiting on a running commit. Batches are counted
    /// inside the open transaction, so they are not durable until `commit`
    /// returns `Ok`.
    pub fn batches_inserted(&self) -> usize {
        self.batches_done.load(Ordering::Acquire)
    }

    /// Register the statement run before the inserts
    ///
    /// Replaces any previously registered statement.
    pub fn delete(&self, sql: impl Into<String>, params: Vec<SqlValue>) -> Result<()> {
        let mut state = self.lock();
        ensure_accumulating(&state)?;
        let sql = sql.into();
        if state.delete.is_some() {
            tracing::debug!("Replacing registered delete with: {}", sql);
        }
        state.delete = Some(DeleteStatement { sql, params });
        Ok(())
    }

    /// Append one row's values
    pub fn add_row(&self, values: impl IntoIterator<Item = SqlValue>) -> Result<()> {
        let mut state = self.lock();
        ensure_accumulating(&state)?;
        state.values.extend(values);
        Ok(())
    }

    /// Run the delete and every insert batch inside one transaction
    ///
    /// Fails before touching the database if `columns` is empty or the
    /// buffer does not divide into whole rows. After that point the loader
    /// is spent whatever the outcome. Any failure, cancellation included,
    /// rolls the transaction back before returning.
    pub fn commit(
        &self,
        conn: &mut Connection,
        cancel: &CancellationToken,
        table: &str,
        columns: &[String],
    ) -> Result<LoadStats> {
        let mut state = self.lock();
        ensure_accumulating(&state)?;

        if columns.is_empty() {
            return Err(Error::ColumnsNotProvided);
        }
        if state.values.len() % columns.len() != 0 {
            return Err(Error::MisalignedBuffer {
                values: state.values.len(),
                columns: columns.len(),
            });
        }

        state.phase = LoaderPhase::Committing;
        let values = std::mem::take(&mut state.values);
        let delete = state.delete.take();
        let result = self.load(conn, cancel, table, columns, &values, delete.as_ref());
        state.phase = LoaderPhase::Spent;
        result
    }

    fn load(
        &self,
        conn: &mut Connection,
        cancel: &CancellationToken,
        table: &str,
        columns: &[String],
        values: &[SqlValue],
        delete: Option<&DeleteStatement>,
    ) -> Result<LoadStats> {
        let started = Instant::now();
        let mut stats = LoadStats::new(table, Utc::now());
        let width = columns.len();
        stats.column_count = width;
        stats.rows_submitted = values.len() / width;

        let batches = partition(stats.rows_submitted, self.max_batch_size);
        if batches.is_empty() {
            if self.max_batch_size == 0 && stats.rows_submitted > 0 {
                tracing::warn!(
                    "max batch size is 0; {} rows for {} not inserted",
                    stats.rows_submitted,
                    table
                );
            }
            if delete.is_some() {
                tracing::warn!("No rows to load into {}; skipping delete", table);
            }
            stats.duration = started.elapsed();
            return Ok(stats);
        }

        if cancel.is_cancelled() {
            return Err(Error::cancelled("begin"));
        }

        let tx = conn
            .transaction()
            .map_err(|e| Error::transaction(format!("begin failed: {e}")))?;

        match self.execute(&tx, cancel, table, columns, values, delete, &batches) {
            Ok((removed, inserted)) => {
                tx.commit()
                    .map_err(|e| Error::transaction(format!("commit failed: {e}")))?;
                stats.rows_removed = removed;
                stats.rows_inserted = inserted;
                stats.duration = started.elapsed();
                tracing::info!("Committed {}", stats);
                Ok(stats)
            }
            Err(e) => {
                tracing::warn!("Rolling back load into {}: {}", table, e);
                if let Err(rb) = tx.rollback() {
                    tracing::error!("Rollback of {} failed: {}", table, rb);
                }
                Err(e)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        tx: &Transaction<'_>,
        cancel: &CancellationToken,
        table: &str,
        columns: &[String],
        values: &[SqlValue],
        delete: Option<&DeleteStatement>,
        batches: &[usize],
    ) -> Result<(usize, usize)> {
        let mut removed = 0;
        if let Some(delete) = delete {
            if cancel.is_cancelled() {
                return Err(Error::cancelled("delete"));
            }
            tracing::debug!("Executing delete: {}", delete.sql);
            removed = tx
                .execute(&delete.sql, params_from_iter(delete.params.iter()))
                .map_err(|e| Error::delete(e.to_string()))?;
        }

        let width = columns.len();
        let full_size = batches[0];
        let last_size = batches[batches.len() - 1];
        let full_sql = insert_template(table, columns, full_size, self.dialect);
        let last_sql = (last_size != full_size)
            .then(|| insert_template(table, columns, last_size, self.dialect));
        tracing::debug!("Insert template ({} rows): {}", full_size, full_sql);

        let total = batches.len();
        let mut inserted = 0;
        let mut offset = 0;
        for (i, &size) in batches.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(Error::cancelled("insert"));
            }
            let sql = match (&last_sql, i + 1 == total) {
                (Some(last), true) => last,
                _ => &full_sql,
            };
            let chunk = &values[offset..offset + size * width];
            let insert_error = |e: duckdb::Error| Error::InsertBatch {
                batch: i + 1,
                batches: total,
                message: e.to_string(),
            };
            let mut stmt = tx.prepare_cached(sql).map_err(insert_error)?;
            inserted += stmt
                .execute(params_from_iter(chunk.iter()))
                .map_err(insert_error)?;
            offset += size * width;
            self.batches_done.fetch_add(1, Ordering::Release);
            tracing::debug!("Inserted batch {}/{} into {}", i + 1, total, table);
        }

        Ok((removed, inserted))
    }

    fn lock(&self) -> MutexGuard<'_, PendingBatch> {
        // State stays consistent across a panicking holder: phase is only
        // advanced after the buffer has been taken.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_accumulating(state: &PendingBatch) -> Result<()> {
    match state.phase {
        LoaderPhase::Accumulating => Ok(()),
        LoaderPhase::Committing | LoaderPhase::Spent => Err(Error::LoaderSpent),
    }
}
