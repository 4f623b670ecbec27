//! Record access, native values and numeric culture.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The native-typed form of a grid field value.
///
/// The native form exists so the formatter can detect floating-point
/// specials (infinity, NaN) that the string form cannot reliably encode.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A floating-point value.
    Real(f64),
    /// A text value.
    Text(String),
    /// A date-time value.
    DateTime(NaiveDateTime),
}

/// Numeric formatting conventions of a locale.
///
/// The host passes its active culture in the export settings; table-property
/// values always parse with [`Culture::INVARIANT`]. Output is always
/// invariant regardless of the parse culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    /// Character separating the integer and fractional parts.
    pub decimal_separator: char,
    /// Character grouping digits in the integer part.
    pub group_separator: char,
}

impl Culture {
    /// Invariant conventions: `.` decimal separator, `,` group separator.
    pub const INVARIANT: Self = Self {
        decimal_separator: '.',
        group_separator: ',',
    };

    /// Create a culture from its two separators.
    #[must_use]
    pub const fn new(decimal_separator: char, group_separator: char) -> Self {
        Self {
            decimal_separator,
            group_separator,
        }
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::INVARIANT
    }
}

/// One record of the host's grid, aligned to the export's logical columns.
///
/// Each field exposes both a string form and a native-typed form; either may
/// be absent. Indices follow the logical column list declaration order.
pub trait GridRecord {
    /// The string form of the field at `index`, if any.
    fn string_value(&self, index: usize) -> Option<String>;

    /// The native-typed form of the field at `index`, if any.
    fn native_value(&self, index: usize) -> Option<NativeValue>;
}

/// A single grid field holding both value forms.
///
/// [`Vec<Field>`] implements [`GridRecord`], which is enough for hosts that
/// materialize rows eagerly and for tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// String form of the value.
    pub string: Option<String>,
    /// Native-typed form of the value.
    pub native: Option<NativeValue>,
}

impl Field {
    /// An empty field (both forms absent).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A field with only a string form.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            string: Some(value.into()),
            native: None,
        }
    }

    /// A field carrying an integer in both forms.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self {
            string: Some(value.to_string()),
            native: Some(NativeValue::Integer(value)),
        }
    }

    /// A field carrying a floating-point value in both forms.
    #[must_use]
    pub fn real(value: f64) -> Self {
        Self {
            string: Some(value.to_string()),
            native: Some(NativeValue::Real(value)),
        }
    }
}

impl GridRecord for Vec<Field> {
    fn string_value(&self, index: usize) -> Option<String> {
        self.get(index).and_then(|f| f.string.clone())
    }

    fn native_value(&self, index: usize) -> Option<NativeValue> {
        self.get(index).and_then(|f| f.native.clone())
    }
}
