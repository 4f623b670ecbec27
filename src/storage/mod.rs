//! SQLite connection sessions and live schema introspection.
//!
//! The export path opens one exclusively-owned connection per call and
//! releases it on every exit path; the import path holds a single long-lived
//! session that is lazily opened and reused across reads. Both apply the
//! configured timeout as the connection's busy timeout.
//!
//! # Submodules
//!
//! - [`session`] - Export and import connection lifecycles
//! - [`introspect`] - Physical column discovery for a live table

pub mod introspect;
pub mod session;

pub use introspect::{table_columns, PhysicalColumn};
pub use session::{ExportSession, ImportSession};

/// Quote an identifier for interpolation into SQL text.
///
/// Double-quote form with embedded quotes doubled, tolerating reserved
/// words and embedded spaces. Identifiers cannot be bound as parameters, so
/// host-controlled table and column names pass through here on their way
/// into SQL text.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
