//! Query capture and the host-facing importer.
//!
//! The configured SQL statement is executed exactly once - statements may
//! have side effects, so the schema and the rows are captured in that one
//! pass. The captured result set is exposed as a single-pass cursor with a
//! terminal exhausted state; restart is not supported.

use std::collections::VecDeque;

use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::debug;

use crate::config::ImportSettings;
use crate::error::Result;
use crate::storage::ImportSession;
use crate::sync::types::{ColumnKind, QueryColumn};

/// A captured result set, iterated once.
///
/// Rows are yielded in statement order. After the last row the buffer is
/// discarded and the cursor stays exhausted; [`QueryRecords::next_record`]
/// keeps returning `None`.
#[derive(Debug)]
pub struct QueryRecords {
    columns: Vec<QueryColumn>,
    rows: VecDeque<Vec<Value>>,
    exhausted: bool,
}

impl QueryRecords {
    /// Execute `sql` once on `conn` and capture schema and rows.
    ///
    /// Column kinds come from result-column declared types where the
    /// statement selects table columns directly; expression columns fall
    /// back to the first non-null captured value, or Text when every value
    /// is null.
    ///
    /// # Errors
    ///
    /// Returns a database error when the statement fails to prepare or run.
    pub fn capture(conn: &Connection, sql: &str) -> Result<Self> {
        let mut stmt = conn.prepare(sql)?;

        let names: Vec<String> = stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        let decls: Vec<Option<String>> = stmt
            .columns()
            .iter()
            .map(|col| col.decl_type().map(str::to_string))
            .collect();

        let column_count = names.len();
        let mut rows = VecDeque::new();
        let mut raw_rows = stmt.query([])?;
        while let Some(row) = raw_rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(row.get::<_, Value>(i)?);
            }
            rows.push_back(values);
        }

        let columns = names
            .into_iter()
            .zip(&decls)
            .enumerate()
            .map(|(i, (name, decl))| {
                let kind = decl
                    .as_deref()
                    .map_or_else(|| infer_kind(&rows, i), ColumnKind::from_decl_type);
                QueryColumn { name, kind }
            })
            .collect();

        debug!(rows = rows.len(), "captured result set");
        Ok(Self {
            columns,
            rows,
            exhausted: false,
        })
    }

    /// Schema of the captured result set.
    #[must_use]
    pub fn columns(&self) -> &[QueryColumn] {
        &self.columns
    }

    /// Whether the cursor has reached its terminal state.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The next record, or `None` once the capture is consumed.
    pub fn next_record(&mut self) -> Option<QueryRecord> {
        match self.rows.pop_front() {
            Some(values) => Some(QueryRecord { values }),
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

impl Iterator for QueryRecords {
    type Item = QueryRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

/// One captured row with integer-indexed string access.
#[derive(Debug, Clone)]
pub struct QueryRecord {
    values: Vec<Value>,
}

impl QueryRecord {
    /// The value at `index` rendered for the host.
    ///
    /// NULL (and out-of-range indices) render as the empty string; numbers
    /// render with invariant conventions; text and date-time values pass
    /// through unchanged so the host can re-parse them in its own locale.
    #[must_use]
    pub fn value(&self, index: usize) -> String {
        match self.values.get(index) {
            None | Some(Value::Null) => String::new(),
            Some(Value::Integer(v)) => v.to_string(),
            Some(Value::Real(v)) => format!("{v}"),
            Some(Value::Text(v)) => v.clone(),
            Some(Value::Blob(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Number of values in this record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record carries no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn infer_kind(rows: &VecDeque<Vec<Value>>, index: usize) -> ColumnKind {
    for row in rows {
        match row.get(index) {
            Some(Value::Integer(_)) => return ColumnKind::Integer,
            Some(Value::Real(_)) => return ColumnKind::Real,
            Some(Value::Text(_) | Value::Blob(_)) => return ColumnKind::Text,
            Some(Value::Null) | None => {}
        }
    }
    ColumnKind::Text
}

/// Outcome of opening the import direction.
#[derive(Debug)]
pub enum ImportOutcome {
    /// The statement ran; records are ready to stream.
    Succeeded(QueryRecords),
    /// The import did not run. Carries a short human-readable message.
    Failed(String),
}

impl ImportOutcome {
    /// Whether the capture succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The captured records, if any.
    #[must_use]
    pub fn records(self) -> Option<QueryRecords> {
        match self {
            Self::Succeeded(records) => Some(records),
            Self::Failed(_) => None,
        }
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

/// The host-facing importer over a shared, injected session.
///
/// Unlike the export path, the connection is held open across reads for
/// the lifetime of the host session; it is released on [`GridImporter::close`]
/// or when the connection string changes.
#[derive(Debug, Default)]
pub struct GridImporter {
    session: ImportSession,
}

impl GridImporter {
    /// Create an importer with a fresh session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: ImportSession::new(),
        }
    }

    /// Create an importer over an existing session.
    #[must_use]
    pub fn with_session(session: ImportSession) -> Self {
        Self { session }
    }

    /// Run one import call: validate, (re)configure the session, ensure a
    /// live connection and capture the statement's result set.
    ///
    /// Configuration problems and database failures are both reported
    /// through the returned outcome; this method does not panic.
    pub fn open(&mut self, settings: &ImportSettings) -> ImportOutcome {
        if let Err(e) = settings.validate() {
            return ImportOutcome::Failed(e.to_string());
        }

        self.session.set_connection_string(&settings.connection_string);
        self.session.set_timeout_secs(settings.timeout_secs);

        let conn = match self.session.ensure_open() {
            Ok(conn) => conn,
            Err(e) => return ImportOutcome::Failed(e.to_string()),
        };

        match QueryRecords::capture(conn, &settings.sql_statement) {
            Ok(records) => ImportOutcome::Succeeded(records),
            Err(e) => ImportOutcome::Failed(e.to_string()),
        }
    }

    /// Release the shared connection (disposal).
    pub fn close(&mut self) {
        self.session.close();
    }

    /// One-line summary of what the given settings would read.
    #[must_use]
    pub fn data_summary(settings: &ImportSettings) -> Option<String> {
        settings.data_summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_db(dir: &TempDir) -> String {
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE events (id INTEGER NOT NULL PRIMARY KEY, at DATETIME NULL, \
             amount REAL NULL, note TEXT NULL);
             INSERT INTO events VALUES (1, '2024-03-05 14:30:00', 2.5, 'first');
             INSERT INTO events VALUES (2, NULL, NULL, NULL);",
        )
        .unwrap();
        path.to_str().unwrap().to_string()
    }

    fn import_settings(connection_string: &str, sql: &str) -> ImportSettings {
        ImportSettings {
            connection_string: connection_string.to_string(),
            sql_statement: sql.to_string(),
            ..ImportSettings::default()
        }
    }

    #[test]
    fn test_capture_schema_and_rows() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let mut importer = GridImporter::new();

        let outcome = importer.open(&import_settings(&db, "SELECT * FROM events ORDER BY id"));
        let mut records = outcome.records().expect("import should succeed");

        let kinds: Vec<ColumnKind> = records.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Integer,
                ColumnKind::DateTime,
                ColumnKind::Real,
                ColumnKind::Text
            ]
        );

        let first = records.next_record().unwrap();
        assert_eq!(first.value(0), "1");
        assert_eq!(first.value(1), "2024-03-05 14:30:00");
        assert_eq!(first.value(2), "2.5");
        assert_eq!(first.value(3), "first");

        // NULLs and out-of-range indices render as empty strings.
        let second = records.next_record().unwrap();
        assert_eq!(second.value(1), "");
        assert_eq!(second.value(99), "");
    }

    #[test]
    fn test_cursor_exhausts_once() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let mut importer = GridImporter::new();

        let mut records = importer
            .open(&import_settings(&db, "SELECT id FROM events"))
            .records()
            .unwrap();

        assert!(!records.is_exhausted());
        assert!(records.next_record().is_some());
        assert!(records.next_record().is_some());
        assert!(records.next_record().is_none());
        assert!(records.is_exhausted());
        assert!(records.next_record().is_none());
    }

    #[test]
    fn test_expression_columns_infer_kind_from_values() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let mut importer = GridImporter::new();

        let records = importer
            .open(&import_settings(
                &db,
                "SELECT id + 1, amount * 2.0, 'x' || note, NULL FROM events ORDER BY id",
            ))
            .records()
            .unwrap();

        let kinds: Vec<ColumnKind> = records.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Integer,
                ColumnKind::Real,
                ColumnKind::Text,
                ColumnKind::Text
            ]
        );
    }

    #[test]
    fn test_statement_runs_once_even_with_side_effects() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let mut importer = GridImporter::new();

        let records = importer
            .open(&import_settings(&db, "SELECT * FROM events"))
            .records()
            .unwrap();
        // Reading the schema and draining rows both come from the single
        // captured pass; no second execution happens.
        assert_eq!(records.columns().len(), 4);
        assert_eq!(records.count(), 2);
    }

    #[test]
    fn test_session_reused_across_opens() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let mut importer = GridImporter::new();

        assert!(importer.open(&import_settings(&db, "SELECT 1")).is_success());
        assert!(importer.open(&import_settings(&db, "SELECT 2")).is_success());
        importer.close();
        // A closed session reopens lazily on the next call.
        assert!(importer.open(&import_settings(&db, "SELECT 3")).is_success());
    }

    #[test]
    fn test_invalid_settings_fail_before_io() {
        let mut importer = GridImporter::new();
        let outcome = importer.open(&ImportSettings::default());
        assert!(!outcome.is_success());
        assert!(outcome.failure().unwrap().contains("Connection String"));
    }

    #[test]
    fn test_bad_statement_fails() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let mut importer = GridImporter::new();
        let outcome = importer.open(&import_settings(&db, "SELECT * FROM missing_table"));
        assert!(!outcome.is_success());
    }
}
