//! Logical column metadata and storage type mapping.

use serde::{Deserialize, Serialize};

/// The type a logical column declares for its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    /// 64-bit signed integer values.
    Integer,
    /// Floating-point values, including infinities and NaN.
    Real,
    /// Free-form text.
    Text,
    /// Date-time values, reformatted on export with the configured pattern.
    DateTime,
}

impl DeclaredType {
    /// Map the declared type to its storage column type affinity.
    ///
    /// Real maps to REAL and Integer to INTEGER; everything else (Text,
    /// DateTime) is stored as TEXT. Total over all declared types.
    #[must_use]
    pub const fn storage_class(self) -> StorageClass {
        match self {
            Self::Real => StorageClass::Real,
            Self::Integer => StorageClass::Integer,
            Self::Text | Self::DateTime => StorageClass::Text,
        }
    }
}

/// Coarse storage type category a database column declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageClass {
    /// INTEGER affinity.
    Integer,
    /// REAL affinity.
    Real,
    /// TEXT affinity.
    Text,
}

impl StorageClass {
    /// The SQL keyword emitted into DDL for this storage class.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }

    /// Parse a declared column type from SQL text into its affinity.
    ///
    /// Follows SQLite's affinity rules: any type containing "INT" is
    /// INTEGER; "REAL", "FLOA" or "DOUB" is REAL; everything else is TEXT.
    #[must_use]
    pub fn from_decl_type(decl: &str) -> Self {
        let upper = decl.to_ascii_uppercase();
        if upper.contains("INT") {
            Self::Integer
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Self::Real
        } else {
            Self::Text
        }
    }

    /// The value substituted when a NOT NULL column has no source value.
    #[must_use]
    pub fn default_value(self) -> String {
        match self {
            Self::Integer | Self::Real => "0".to_string(),
            Self::Text => String::new(),
        }
    }
}

/// Where a logical column's values originate.
///
/// Table-property values are parsed with invariant numeric conventions;
/// per-record field values are parsed with the caller's active culture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrigin {
    /// A per-record grid field.
    #[default]
    RecordField,
    /// A host table property applied to every record.
    TableProperty,
}

/// A field definition supplied by the host for one export call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalColumn {
    /// Column name as the host declares it.
    pub name: String,
    /// Whether this column is part of the primary key.
    pub is_key: bool,
    /// Declared value type.
    pub declared_type: DeclaredType,
    /// Optional default value in string form.
    pub default_value: Option<String>,
    /// Value origin, selecting the numeric parse culture.
    pub origin: ColumnOrigin,
}

impl LogicalColumn {
    /// Create a plain nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            is_key: false,
            declared_type,
            default_value: None,
            origin: ColumnOrigin::RecordField,
        }
    }

    /// Mark this column as a key column.
    #[must_use]
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Attach a default value (string form).
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Mark this column as sourced from a host table property.
    #[must_use]
    pub fn from_table_property(mut self) -> Self {
        self.origin = ColumnOrigin::TableProperty;
        self
    }
}
