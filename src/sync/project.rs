//! Per-record row projection.
//!
//! Produces one ordered row of formatted values per logical record, aligned
//! to the physical column list through the reconciled mapping. Rows are
//! bound and discarded immediately by the sync engine; they are never
//! persisted.

use crate::model::{GridRecord, LogicalColumn};
use crate::storage::PhysicalColumn;
use crate::sync::format::{format_value, FormatOptions};

/// Project one record into a row of formatted values.
///
/// One slot per physical column, in physical order. A missing or empty
/// value (no reconciled source, or the formatter degraded it) becomes
/// `None` for nullable columns; NOT NULL columns receive the empty string
/// as-is or the storage-class default when nothing formatted at all, so the
/// row always carries a value for every physical slot.
#[must_use]
pub fn project_row<R: GridRecord>(
    record: &R,
    physical: &[PhysicalColumn],
    logical: &[LogicalColumn],
    mapping: &[Option<usize>],
    opts: &FormatOptions<'_>,
) -> Vec<Option<String>> {
    physical
        .iter()
        .zip(mapping)
        .map(|(phys, slot)| {
            let formatted = slot
                .and_then(|idx| logical.get(idx).map(|col| (idx, col)))
                .and_then(|(idx, col)| {
                    let raw = record.string_value(idx);
                    let native = record.native_value(idx);
                    format_value(raw.as_deref(), native.as_ref(), col, opts)
                });

            match formatted {
                Some(value) if !value.is_empty() => Some(value),
                _ if phys.allows_null => None,
                Some(value) => Some(value),
                None => Some(phys.storage.default_value()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Culture, DeclaredType, Field, StorageClass};
    use crate::sync::reconcile::reconcile;

    fn opts() -> FormatOptions<'static> {
        FormatOptions {
            culture: Culture::INVARIANT,
            datetime_format: "%Y-%m-%d %H:%M:%S",
        }
    }

    fn phys(name: &str, storage: StorageClass, allows_null: bool) -> PhysicalColumn {
        PhysicalColumn {
            name: name.to_string(),
            storage,
            allows_null,
        }
    }

    #[test]
    fn test_row_follows_physical_order() {
        let logical = vec![
            LogicalColumn::new("id", DeclaredType::Integer).key(),
            LogicalColumn::new("name", DeclaredType::Text),
        ];
        // Physical order reversed relative to logical declaration.
        let physical = vec![
            phys("name", StorageClass::Text, true),
            phys("id", StorageClass::Integer, false),
        ];
        let mapping = reconcile(&physical, &logical);
        let record = vec![Field::integer(7), Field::text("widget")];

        let row = project_row(&record, &physical, &logical, &mapping, &opts());
        assert_eq!(
            row,
            vec![Some("widget".to_string()), Some("7".to_string())]
        );
    }

    #[test]
    fn test_unmatched_nullable_slot_is_null() {
        let logical = vec![LogicalColumn::new("id", DeclaredType::Integer)];
        let physical = vec![
            phys("id", StorageClass::Integer, true),
            phys("orphan", StorageClass::Text, true),
        ];
        let mapping = reconcile(&physical, &logical);
        let record = vec![Field::integer(1)];

        let row = project_row(&record, &physical, &logical, &mapping, &opts());
        assert_eq!(row, vec![Some("1".to_string()), None]);
    }

    #[test]
    fn test_not_null_slot_gets_storage_default() {
        let logical = vec![
            LogicalColumn::new("id", DeclaredType::Integer).key(),
            LogicalColumn::new("label", DeclaredType::Text),
        ];
        let physical = vec![
            phys("id", StorageClass::Integer, false),
            phys("label", StorageClass::Text, false),
        ];
        let mapping = reconcile(&physical, &logical);
        // Empty integer and missing text both fail to format.
        let record = vec![Field::empty(), Field::empty()];

        let row = project_row(&record, &physical, &logical, &mapping, &opts());
        assert_eq!(row, vec![Some("0".to_string()), Some(String::new())]);
    }

    #[test]
    fn test_empty_text_in_nullable_column_is_null() {
        let logical = vec![LogicalColumn::new("note", DeclaredType::Text)];
        let physical = vec![phys("note", StorageClass::Text, true)];
        let mapping = reconcile(&physical, &logical);
        let record = vec![Field::text("")];

        let row = project_row(&record, &physical, &logical, &mapping, &opts());
        assert_eq!(row, vec![None]);
    }

    #[test]
    fn test_parse_failure_degrades_to_null() {
        let logical = vec![LogicalColumn::new("qty", DeclaredType::Integer)];
        let physical = vec![phys("qty", StorageClass::Integer, true)];
        let mapping = reconcile(&physical, &logical);
        let record = vec![Field::text("many")];

        let row = project_row(&record, &physical, &logical, &mapping, &opts());
        assert_eq!(row, vec![None]);
    }
}
