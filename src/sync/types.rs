//! Shared types for the export and import paths.

use serde::{Deserialize, Serialize};

/// Statistics for one completed export call.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct ExportStats {
    /// Number of rows inserted.
    pub rows: usize,
    /// Number of physical columns in the recreated table.
    pub columns: usize,
}

/// The value kind of an imported result column, as reported to the host.
///
/// Date-time columns are declared specially so the host can re-parse the
/// stored text in its own preferred locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer values.
    Integer,
    /// Floating-point values.
    Real,
    /// Text values.
    Text,
    /// Date-time values stored as text.
    DateTime,
}

impl ColumnKind {
    /// Derive a kind from a result column's declared type text.
    ///
    /// Date/time declarations take precedence over affinity so the host
    /// knows to re-parse; everything else follows SQLite affinity rules.
    #[must_use]
    pub fn from_decl_type(decl: &str) -> Self {
        let upper = decl.to_ascii_uppercase();
        if upper.contains("DATE") || upper.contains("TIME") {
            Self::DateTime
        } else if upper.contains("INT") {
            Self::Integer
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Self::Real
        } else {
            Self::Text
        }
    }
}

/// Schema of one column in an imported result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryColumn {
    /// Column name as the statement reports it.
    pub name: String,
    /// Value kind for host-side interpretation.
    pub kind: ColumnKind,
}
