//! Physical column discovery for a live table.
//!
//! The created table's schema is re-read from the database after creation
//! because storage affinity and nullability may differ subtly from what was
//! requested. A zero-row `SELECT *` supplies the authoritative column order,
//! names and declared types; `PRAGMA table_info` is merged in for
//! nullability, which statement metadata does not carry.

use std::collections::HashMap;

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;
use crate::model::StorageClass;
use crate::storage::quote_identifier;

/// A column as it actually exists in the database table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalColumn {
    /// Column name as the database reports it.
    pub name: String,
    /// Storage type affinity derived from the declared type.
    pub storage: StorageClass,
    /// Whether the column accepts NULL.
    pub allows_null: bool,
}

/// Read name, storage class and nullability for every column of `table`,
/// in the table's column order.
///
/// # Errors
///
/// Returns a database error when the table does not exist or the queries
/// fail.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<PhysicalColumn>> {
    let quoted = quote_identifier(table);

    // notnull by lowercased column name, from the table definition.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({quoted})"))?;
    let not_null: HashMap<String, bool> = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let notnull: i64 = row.get(3)?;
            Ok((name.to_lowercase(), notnull != 0))
        })?
        .collect::<rusqlite::Result<_>>()?;

    // Zero-row select: authoritative order, names and declared types.
    let stmt = conn.prepare(&format!("SELECT * FROM {quoted} WHERE 1 = 0"))?;
    let columns = stmt
        .columns()
        .iter()
        .map(|col| {
            let name = col.name().to_string();
            let storage = col
                .decl_type()
                .map_or(StorageClass::Text, StorageClass::from_decl_type);
            let allows_null = !not_null.get(&name.to_lowercase()).copied().unwrap_or(false);
            PhysicalColumn {
                name,
                storage,
                allows_null,
            }
        })
        .collect::<Vec<_>>();

    debug!(table, count = columns.len(), "introspected physical columns");
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_columns_in_order_with_affinity() {
        let conn = memory_db();
        conn.execute(
            "CREATE TABLE t (\"id\" INTEGER NOT NULL PRIMARY KEY, \"rate\" REAL NULL, \"name\" TEXT NULL)",
            [],
        )
        .unwrap();

        let cols = table_columns(&conn, "t").unwrap();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[0].storage, StorageClass::Integer);
        assert!(!cols[0].allows_null);
        assert_eq!(cols[1].storage, StorageClass::Real);
        assert!(cols[1].allows_null);
        assert_eq!(cols[2].storage, StorageClass::Text);
    }

    #[test]
    fn test_reserved_word_and_spaced_names() {
        let conn = memory_db();
        conn.execute(
            "CREATE TABLE \"select\" (\"order by\" TEXT NULL, \"group\" INTEGER NOT NULL)",
            [],
        )
        .unwrap();

        let cols = table_columns(&conn, "select").unwrap();
        assert_eq!(cols[0].name, "order by");
        assert!(cols[0].allows_null);
        assert_eq!(cols[1].name, "group");
        assert!(!cols[1].allows_null);
    }

    #[test]
    fn test_missing_table_errors() {
        let conn = memory_db();
        assert!(table_columns(&conn, "missing").is_err());
    }
}
