//! Connection lifecycles for the two bridge directions.
//!
//! Export rebuilds aggressively: one connection per call, opened at call
//! start and dropped on every exit path. Import expects repeated reads
//! against a stable connection: one session per host scope, lazily opened,
//! reused until disposal or a connection-string change.

use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A database session exclusively owned by one export call.
///
/// Dropping the session closes the connection, so release is guaranteed on
/// success and on error paths alike.
#[derive(Debug)]
pub struct ExportSession {
    conn: Connection,
    timeout_secs: u32,
    datetime_format: String,
}

impl ExportSession {
    /// Open a connection for one export call.
    ///
    /// The connection string is a database path or `file:` URI; the timeout
    /// is applied as the connection's busy timeout so each blocking command
    /// is bounded under contention.
    ///
    /// # Errors
    ///
    /// Returns a connection error when the database cannot be opened.
    pub fn open(
        connection_string: &str,
        timeout_secs: u32,
        datetime_format: &str,
    ) -> Result<Self> {
        let conn = open_connection(connection_string, timeout_secs)?;
        debug!(connection_string, "export session opened");
        Ok(Self {
            conn,
            timeout_secs,
            datetime_format: datetime_format.to_string(),
        })
    }

    /// The underlying connection.
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access to the underlying connection (for transactions).
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// The timeout budget in seconds attached to each command.
    #[must_use]
    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    /// The pattern used to store date-time values.
    #[must_use]
    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }
}

/// The shared, lazily-reopened session used by the import path.
///
/// Owned by the host-session scope and injected into the importer. The
/// connection stays open across reads until [`ImportSession::close`] is
/// called or the connection string changes.
#[derive(Debug, Default)]
pub struct ImportSession {
    connection_string: String,
    timeout_secs: u32,
    conn: Option<Connection>,
}

impl ImportSession {
    /// Create a session with no connection yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_string: String::new(),
            timeout_secs: crate::config::DEFAULT_TIMEOUT_SECS,
            conn: None,
        }
    }

    /// Point the session at a connection string.
    ///
    /// A change of connection string closes any held connection so the next
    /// read reopens against the new target.
    pub fn set_connection_string(&mut self, connection_string: &str) {
        if self.connection_string != connection_string {
            if self.conn.is_some() {
                debug!("connection string changed, closing held connection");
            }
            self.close();
            self.connection_string = connection_string.to_string();
        }
    }

    /// Set the timeout applied when the connection is (re)opened.
    pub fn set_timeout_secs(&mut self, timeout_secs: u32) {
        self.timeout_secs = timeout_secs;
    }

    /// Whether a connection is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Ensure an open, live connection and return it.
    ///
    /// Opens lazily on first use. A held connection is probed with a trivial
    /// query; if the probe fails the connection is closed and reopened once
    /// before the session gives up.
    ///
    /// # Errors
    ///
    /// Returns a connection error when the connection string is blank or the
    /// database cannot be reached after the single retry.
    pub fn ensure_open(&mut self) -> Result<&Connection> {
        if self.connection_string.is_empty() {
            return Err(Error::Connection(
                "ConnectionString Is Blank".to_string(),
            ));
        }

        let held_is_live = self.conn.as_ref().is_some_and(probe);
        if self.conn.is_some() && !held_is_live {
            warn!("held connection failed probe, reopening once");
            self.close();
        }

        if self.conn.is_none() {
            let conn = open_connection(&self.connection_string, self.timeout_secs)?;
            if !probe(&conn) {
                return Err(Error::Connection(
                    "Connection Is Closed. Fix Connection String and Retry".to_string(),
                ));
            }
            debug!(connection_string = %self.connection_string, "import session opened");
            self.conn = Some(conn);
        }

        self.conn
            .as_ref()
            .ok_or_else(|| Error::Connection("connection unavailable".to_string()))
    }

    /// Close and release the held connection, if any.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("import session closed");
        }
    }
}

fn open_connection(connection_string: &str, timeout_secs: u32) -> Result<Connection> {
    let conn = Connection::open(connection_string)
        .map_err(|e| Error::Connection(format!("cannot open {connection_string}: {e}")))?;
    conn.busy_timeout(Duration::from_secs(u64::from(timeout_secs)))?;
    Ok(conn)
}

fn probe(conn: &Connection) -> bool {
    conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_session_open_and_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        let session =
            ExportSession::open(path.to_str().unwrap(), 30, "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(session.timeout_secs(), 30);
        assert_eq!(session.datetime_format(), "%Y-%m-%d %H:%M:%S");
        session.conn().execute("CREATE TABLE t (x INTEGER)", []).unwrap();
    }

    #[test]
    fn test_export_session_open_failure() {
        let err = ExportSession::open("/nonexistent-dir/nope/test.db", 30, "%Y-%m-%d")
            .unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[test]
    fn test_import_session_blank_connection_string() {
        let mut session = ImportSession::new();
        let err = session.ensure_open().unwrap_err();
        assert!(err.to_string().contains("Blank"));
    }

    #[test]
    fn test_import_session_reuse_and_close() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        let mut session = ImportSession::new();
        session.set_connection_string(path.to_str().unwrap());

        session.ensure_open().unwrap();
        assert!(session.is_open());

        // Second call reuses the held connection.
        session.ensure_open().unwrap();
        assert!(session.is_open());

        session.close();
        assert!(!session.is_open());
    }

    #[test]
    fn test_import_session_closes_on_connection_string_change() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.db");
        let second = temp_dir.path().join("b.db");
        let mut session = ImportSession::new();

        session.set_connection_string(first.to_str().unwrap());
        session.ensure_open().unwrap();
        assert!(session.is_open());

        session.set_connection_string(second.to_str().unwrap());
        assert!(!session.is_open());

        // Same string again does not drop the connection.
        session.ensure_open().unwrap();
        session.set_connection_string(second.to_str().unwrap());
        assert!(session.is_open());
    }
}
