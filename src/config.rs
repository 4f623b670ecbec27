//! Host-level settings for the export and import directions.
//!
//! The bridge is configured through string properties the host persists:
//! a connection string, a connection timeout in seconds, and per direction
//! either a target table name plus date-time format (export) or a SQL
//! statement (import). Validation runs before any database I/O and failures
//! surface as user-facing configuration messages, not panics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Culture;

/// Property key for the database connection string.
pub const PROP_CONNECTION_STRING: &str = "ConnectionString";
/// Property key for the connection timeout in seconds.
pub const PROP_CONNECTION_TIMEOUT: &str = "ConnectionTimeOut";
/// Property key for the export date-time format pattern.
pub const PROP_DATETIME_FORMAT: &str = "DateTimeFormat";
/// Property key for the export target table name.
pub const PROP_TABLE_NAME: &str = "DatabaseTableName";
/// Property key for the import SQL statement.
pub const PROP_SQL_STATEMENT: &str = "SQLStatement";

/// Default connection timeout when the host does not supply one.
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;
/// Default date-time pattern used to store values.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings for one export call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Database path or `file:` URI.
    pub connection_string: String,
    /// Timeout budget in seconds for each database command.
    pub timeout_secs: u32,
    /// chrono pattern used to store date-time values.
    pub datetime_format: String,
    /// Target table to drop and recreate.
    pub table_name: String,
    /// The caller's active numeric culture for per-record field values.
    #[serde(default = "Culture::default")]
    pub culture: Culture,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            table_name: String::new(),
            culture: Culture::INVARIANT,
        }
    }
}

impl ExportSettings {
    /// Build settings from the host's string property bag.
    ///
    /// Missing properties fall back to their defaults; a non-numeric timeout
    /// becomes zero so that validation reports it.
    #[must_use]
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        Self {
            connection_string: prop(properties, PROP_CONNECTION_STRING),
            timeout_secs: parse_timeout(properties),
            datetime_format: properties
                .get(PROP_DATETIME_FORMAT)
                .cloned()
                .unwrap_or_else(|| DEFAULT_DATETIME_FORMAT.to_string()),
            table_name: prop(properties, PROP_TABLE_NAME),
            culture: Culture::INVARIANT,
        }
    }

    /// Validate all properties before any database I/O.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(Error::Config(
                "The Connection String parameter is not specified".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "The Connection TimeOut parameter needs to be greater than zero".to_string(),
            ));
        }
        if self.datetime_format.trim().is_empty() {
            return Err(Error::Config(
                "The DateTime Format parameter is not specified".to_string(),
            ));
        }
        if self.table_name.trim().is_empty() {
            return Err(Error::Config(
                "The Database Table Name parameter is not specified".to_string(),
            ));
        }
        Ok(())
    }

    /// One-line summary of where this export writes, or `None` when the
    /// target table is not configured yet.
    #[must_use]
    pub fn data_summary(&self) -> Option<String> {
        if self.table_name.trim().is_empty() {
            return None;
        }
        Some(format!(
            "Exporting to {} : {} table",
            self.connection_string, self.table_name
        ))
    }
}

/// Settings for the import direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Database path or `file:` URI.
    pub connection_string: String,
    /// Timeout budget in seconds for each database command.
    pub timeout_secs: u32,
    /// The SQL statement producing the result set to read.
    pub sql_statement: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sql_statement: String::new(),
        }
    }
}

impl ImportSettings {
    /// Build settings from the host's string property bag.
    #[must_use]
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        Self {
            connection_string: prop(properties, PROP_CONNECTION_STRING),
            timeout_secs: parse_timeout(properties),
            sql_statement: prop(properties, PROP_SQL_STATEMENT),
        }
    }

    /// Validate all properties before any database I/O.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(Error::Config(
                "The Connection String parameter is not specified".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "The Connection TimeOut parameter needs to be greater than zero".to_string(),
            ));
        }
        if self.sql_statement.trim().is_empty() {
            return Err(Error::Config(
                "The SQL Statement parameter is not specified".to_string(),
            ));
        }
        Ok(())
    }

    /// One-line summary of what this import reads, or `None` when the
    /// statement is not configured yet.
    #[must_use]
    pub fn data_summary(&self) -> Option<String> {
        if self.sql_statement.trim().is_empty() {
            return None;
        }
        Some(format!(
            "Bound to {} : '{}' statement",
            self.connection_string, self.sql_statement
        ))
    }
}

fn prop(properties: &HashMap<String, String>, key: &str) -> String {
    properties.get(key).cloned().unwrap_or_default()
}

fn parse_timeout(properties: &HashMap<String, String>) -> u32 {
    properties
        .get(PROP_CONNECTION_TIMEOUT)
        .map_or(DEFAULT_TIMEOUT_SECS, |raw| {
            raw.trim().parse().unwrap_or(0)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_export_from_properties_defaults() {
        let settings = ExportSettings::from_properties(&props(&[
            (PROP_CONNECTION_STRING, "/tmp/test.db"),
            (PROP_TABLE_NAME, "orders"),
        ]));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.datetime_format, DEFAULT_DATETIME_FORMAT);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_export_validation_messages() {
        let mut settings = ExportSettings::default();
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("Connection String"));

        settings.connection_string = "/tmp/test.db".to_string();
        settings.timeout_secs = 0;
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("greater than zero"));

        settings.timeout_secs = 30;
        settings.datetime_format = "  ".to_string();
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("DateTime Format"));

        settings.datetime_format = DEFAULT_DATETIME_FORMAT.to_string();
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("Database Table Name"));
    }

    #[test]
    fn test_bad_timeout_fails_validation() {
        let settings = ExportSettings::from_properties(&props(&[
            (PROP_CONNECTION_STRING, "/tmp/test.db"),
            (PROP_TABLE_NAME, "orders"),
            (PROP_CONNECTION_TIMEOUT, "soon"),
        ]));
        assert_eq!(settings.timeout_secs, 0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_import_validation_and_summary() {
        let settings = ImportSettings::from_properties(&props(&[
            (PROP_CONNECTION_STRING, "/tmp/test.db"),
            (PROP_SQL_STATEMENT, "SELECT 1"),
        ]));
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.data_summary().unwrap(),
            "Bound to /tmp/test.db : 'SELECT 1' statement"
        );

        let empty = ImportSettings::default();
        assert!(empty.data_summary().is_none());
    }

    #[test]
    fn test_export_summary() {
        let settings = ExportSettings {
            connection_string: "/tmp/test.db".to_string(),
            table_name: "orders".to_string(),
            ..ExportSettings::default()
        };
        assert_eq!(
            settings.data_summary().unwrap(),
            "Exporting to /tmp/test.db : orders table"
        );
    }

    #[test]
    fn test_settings_serialize_round_trip() {
        let settings = ExportSettings {
            connection_string: "/tmp/test.db".to_string(),
            table_name: "orders".to_string(),
            ..ExportSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: ExportSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.table_name, "orders");
        assert_eq!(back.culture, Culture::INVARIANT);
    }
}
