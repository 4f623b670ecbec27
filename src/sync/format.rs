//! Type-directed value normalization.
//!
//! Converts one logical field value, given as both a string and an optional
//! native-typed form, into the database-ready string for its declared
//! column type. `None` renders downstream as SQL NULL.
//!
//! This function never fails: empty input and parse failures degrade to
//! `None`. That silently masks malformed input as NULL, which is the
//! documented policy for the bridge.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{ColumnOrigin, Culture, DeclaredType, LogicalColumn, NativeValue};

/// Caller-scoped options threaded through formatting.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    /// The caller's active numeric culture for record field values.
    pub culture: Culture,
    /// chrono pattern used to store date-time values.
    pub datetime_format: &'a str,
}

/// Date-time layouts accepted by the permissive parse, tried in order
/// after RFC 3339.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, completed with midnight.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Format one field value for its declared column type.
///
/// `raw` is the string form (absent is treated as empty), `native` the
/// native-typed form when the host has one. Table-property columns parse
/// numerics with invariant conventions; record fields use the caller's
/// culture from `opts`. Returns `None` for SQL NULL.
#[must_use]
pub fn format_value(
    raw: Option<&str>,
    native: Option<&NativeValue>,
    column: &LogicalColumn,
    opts: &FormatOptions<'_>,
) -> Option<String> {
    let raw = raw.unwrap_or("");
    let culture = match column.origin {
        ColumnOrigin::TableProperty => Culture::INVARIANT,
        ColumnOrigin::RecordField => opts.culture,
    };

    match column.declared_type {
        DeclaredType::Integer => {
            if raw.is_empty() {
                return None;
            }
            parse_i64(raw, culture).map(|v| v.to_string())
        }
        DeclaredType::Real => {
            if let Some(NativeValue::Real(v)) = native {
                return classify_real(*v);
            }
            if raw.is_empty() {
                return None;
            }
            parse_f64(raw, culture).and_then(classify_real)
        }
        DeclaredType::DateTime => {
            if raw.is_empty() {
                return None;
            }
            parse_datetime(raw).and_then(|dt| render_datetime(&dt, opts.datetime_format))
        }
        DeclaredType::Text => Some(raw.to_string()),
    }
}

/// Classify a floating value into its stored form.
///
/// Positive and negative infinity become the literal tokens `Infinity` and
/// `-Infinity` (stored as text); NaN becomes NULL. Finite values always
/// render with an invariant decimal point, because a decimal comma would
/// corrupt the stored value.
fn classify_real(value: f64) -> Option<String> {
    if value.is_nan() {
        None
    } else if value == f64::INFINITY {
        Some("Infinity".to_string())
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity".to_string())
    } else {
        Some(format!("{value}"))
    }
}

/// Parse a 64-bit integer under the given culture.
///
/// Group separators are stripped; a fractional part is accepted only when
/// it is zero.
fn parse_i64(raw: &str, culture: Culture) -> Option<i64> {
    let normalized = normalize_number(raw, culture)?;
    if let Ok(v) = normalized.parse::<i64>() {
        return Some(v);
    }
    // "1.0" style input: accept when the fraction is zero and in range.
    let v = normalized.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&v) {
        #[allow(clippy::cast_possible_truncation)]
        return Some(v as i64);
    }
    None
}

/// Parse a floating value under the given culture.
fn parse_f64(raw: &str, culture: Culture) -> Option<f64> {
    normalize_number(raw, culture)?.parse::<f64>().ok()
}

/// Strip group separators and normalize the decimal separator to `.`.
fn normalize_number(raw: &str, culture: Culture) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped: String = trimmed
        .chars()
        .filter(|c| *c != culture.group_separator)
        .map(|c| if c == culture.decimal_separator { '.' } else { c })
        .collect();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Permissive date-time parse: RFC 3339, then common date-time layouts,
/// then date-only layouts completed with midnight.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(dt);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, layout) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Render a date-time with the caller-supplied pattern.
///
/// A bad pattern surfaces as a formatting error rather than a panic, and
/// degrades to `None` like any other coercion failure.
fn render_datetime(dt: &NaiveDateTime, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).ok()?;
    Some(out)
}
