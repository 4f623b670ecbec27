//! The table sync engine and the host-facing exporter.
//!
//! Every export fully drops and recreates the target table, then bulk-loads
//! all records inside one transaction. There is no delta sync and no
//! partial commit: any failure aborts the whole call and the transaction
//! rolls back.

use std::sync::Mutex;

use rusqlite::TransactionBehavior;
use tracing::{debug, info};

use crate::config::ExportSettings;
use crate::error::Result;
use crate::model::{Culture, GridRecord, LogicalColumn};
use crate::storage::{quote_identifier, table_columns, ExportSession};
use crate::sync::ddl::build_create_table;
use crate::sync::format::FormatOptions;
use crate::sync::project::project_row;
use crate::sync::reconcile::reconcile;
use crate::sync::types::ExportStats;

/// Drives one export call against an exclusively-owned session.
pub struct TableSyncEngine<'a> {
    session: &'a mut ExportSession,
    culture: Culture,
}

impl<'a> TableSyncEngine<'a> {
    /// Create an engine over an open export session.
    #[must_use]
    pub fn new(session: &'a mut ExportSession, culture: Culture) -> Self {
        Self { session, culture }
    }

    /// Synchronize `table` to exactly the given columns and records.
    ///
    /// Steps: drop any existing table, create it anew, re-read the physical
    /// schema, then insert every record in host order inside one IMMEDIATE
    /// transaction, committing once after all rows succeed.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole call; the transaction rolls back and
    /// the error is wrapped with the offending table name.
    pub fn sync_table<R, I>(
        &mut self,
        table: &str,
        columns: &[LogicalColumn],
        records: I,
    ) -> Result<ExportStats>
    where
        R: GridRecord,
        I: IntoIterator<Item = R>,
    {
        self.sync_inner(table, columns, records)
            .map_err(|e| e.for_table(table))
    }

    fn sync_inner<R, I>(
        &mut self,
        table: &str,
        columns: &[LogicalColumn],
        records: I,
    ) -> Result<ExportStats>
    where
        R: GridRecord,
        I: IntoIterator<Item = R>,
    {
        let datetime_format = self.session.datetime_format().to_string();
        let opts = FormatOptions {
            culture: self.culture,
            datetime_format: &datetime_format,
        };

        let create_sql = build_create_table(table, columns, &opts)?;
        let quoted = quote_identifier(table);

        debug!(table, "dropping existing table");
        self.session
            .conn()
            .execute(&format!("DROP TABLE IF EXISTS {quoted}"), [])?;

        debug!(table, "creating table");
        self.session.conn().execute(&create_sql, [])?;

        // The live schema is authoritative: affinity and nullability may
        // differ subtly from what was requested.
        let physical = table_columns(self.session.conn(), table)?;
        let mapping = reconcile(&physical, columns);

        let placeholders = vec!["?"; physical.len()].join(", ");
        let insert_sql = format!("INSERT INTO {quoted} VALUES ({placeholders})");

        let tx = self
            .session
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut rows = 0usize;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for record in records {
                let row = project_row(&record, &physical, columns, &mapping, &opts);
                stmt.execute(rusqlite::params_from_iter(row.iter()))?;
                rows += 1;
            }
        }
        tx.commit()?;

        info!(table, rows, columns = physical.len(), "export complete");
        Ok(ExportStats {
            rows,
            columns: physical.len(),
        })
    }
}

/// Outcome of one export call, as reported to the host.
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// The table was recreated and all rows committed.
    Succeeded(ExportStats),
    /// The export did not happen; no rows are visible. Carries a short
    /// human-readable message with the underlying cause appended.
    Failed(String),
}

impl ExportOutcome {
    /// Whether the export committed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The failure message, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(msg) => Some(msg),
        }
    }
}

/// The host-facing exporter.
///
/// Validates settings before any I/O and serializes concurrent export
/// calls: only one `export` may run at a time per exporter instance, so
/// two exports never race on DROP/CREATE for the same table.
#[derive(Debug, Default)]
pub struct GridExporter {
    guard: Mutex<()>,
}

impl GridExporter {
    /// Create an exporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one export call.
    ///
    /// Opens a connection for the duration of the call, recreates the
    /// target table and bulk-loads `records`. Configuration problems and
    /// pipeline failures are both reported through the returned outcome;
    /// this method does not panic.
    pub fn export<R, I>(
        &self,
        settings: &ExportSettings,
        columns: &[LogicalColumn],
        records: I,
    ) -> ExportOutcome
    where
        R: GridRecord,
        I: IntoIterator<Item = R>,
    {
        if let Err(e) = settings.validate() {
            return ExportOutcome::Failed(e.to_string());
        }

        // Serialize exports for the full connection-open -> commit span.
        let _lock = self.guard.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut session = match ExportSession::open(
            &settings.connection_string,
            settings.timeout_secs,
            &settings.datetime_format,
        ) {
            Ok(session) => session,
            Err(e) => return ExportOutcome::Failed(e.to_string()),
        };

        let mut engine = TableSyncEngine::new(&mut session, settings.culture);
        match engine.sync_table(&settings.table_name, columns, records) {
            Ok(stats) => ExportOutcome::Succeeded(stats),
            Err(e) => ExportOutcome::Failed(e.to_string()),
        }
    }

    /// One-line summary of where the given settings would export.
    #[must_use]
    pub fn data_summary(settings: &ExportSettings) -> Option<String> {
        settings.data_summary()
    }
}
