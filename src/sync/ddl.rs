//! CREATE TABLE generation from the logical column list.

use crate::error::{Error, Result};
use crate::model::LogicalColumn;
use crate::storage::quote_identifier;
use crate::sync::format::{format_value, FormatOptions};

/// Build the `CREATE TABLE` statement for `table` from `columns`.
///
/// One clause per logical column, in declaration order. Key columns are
/// `NOT NULL PRIMARY KEY` with no default. Non-key columns with a non-empty
/// default value whose formatted form is also non-empty get
/// `NULL DEFAULT '<formatted>'`; otherwise they are plain nullable columns.
///
/// Column names are quote-escaped but interpolated into the SQL text (DDL
/// cannot bind parameters); default literals have embedded quotes doubled.
///
/// # Errors
///
/// Fails with [`Error::NoColumns`] when the column list is empty.
pub fn build_create_table(
    table: &str,
    columns: &[LogicalColumn],
    opts: &FormatOptions<'_>,
) -> Result<String> {
    if columns.is_empty() {
        return Err(Error::NoColumns {
            table: table.to_string(),
        });
    }

    let clauses: Vec<String> = columns
        .iter()
        .map(|col| column_clause(col, opts))
        .collect();

    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_identifier(table),
        clauses.join(", ")
    ))
}

fn column_clause(col: &LogicalColumn, opts: &FormatOptions<'_>) -> String {
    let name = quote_identifier(&col.name);
    let storage = col.declared_type.storage_class().as_sql();

    if col.is_key {
        return format!("{name} {storage} NOT NULL PRIMARY KEY");
    }

    if let Some(default) = col.default_value.as_deref() {
        if !default.is_empty() {
            let formatted = format_value(Some(default), None, col, opts);
            if let Some(value) = formatted.filter(|v| !v.is_empty()) {
                return format!(
                    "{name} {storage} NULL DEFAULT '{}'",
                    value.replace('\'', "''")
                );
            }
        }
    }

    format!("{name} {storage} NULL")
}
