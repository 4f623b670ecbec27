//! Error types for gridbridge.
//!
//! The error surface follows the failure classes of the bridge:
//! configuration problems detected before any I/O, connection failures,
//! schema failures (nothing to create), and whole-export failures wrapping
//! the underlying cause together with the offending table name.
//!
//! Value coercion failures are deliberately absent here: the formatter
//! degrades them to SQL NULL instead of erroring.

use thiserror::Error;

/// Result type alias for gridbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridbridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A host-level property is missing or invalid. Detected before any
    /// database I/O.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database session could not be opened or kept alive.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The logical column list was empty; a table with zero columns cannot
    /// be created.
    #[error("Cannot create table {table}: no columns available")]
    NoColumns {
        /// Target table name.
        table: String,
    },

    /// An export failed mid-pipeline. Carries the target table name and the
    /// underlying cause; the transaction has been rolled back.
    #[error("There was a problem exporting. Table={table}: {source}")]
    Export {
        /// Target table name.
        table: String,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Database-level failure from the SQLite layer.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    /// Wrap this error as an export failure for the given table.
    ///
    /// Export wrappers are not nested: wrapping an already-wrapped error
    /// returns it unchanged.
    #[must_use]
    pub fn for_table(self, table: &str) -> Self {
        match self {
            Self::Export { .. } => self,
            other => Self::Export {
                table: table.to_string(),
                source: Box::new(other),
            },
        }
    }
}
