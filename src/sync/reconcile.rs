//! Physical-to-logical column matching.

use crate::model::LogicalColumn;
use crate::storage::PhysicalColumn;

/// Match physical columns to logical columns by case-insensitive name.
///
/// Returns one entry per physical column, in physical-column order: the
/// index of the matching logical column, or `None` when no logical column
/// carries that name. The search scans the logical list from its start for
/// every physical column, so duplicate logical names bind to the first
/// occurrence repeatedly (known limitation).
///
/// Unmatched physical columns keep their slot; the projector fills it with
/// NULL (or the storage default for NOT NULL columns) so row arity always
/// matches the physical schema.
#[must_use]
pub fn reconcile(physical: &[PhysicalColumn], logical: &[LogicalColumn]) -> Vec<Option<usize>> {
    physical
        .iter()
        .map(|phys| {
            logical
                .iter()
                .position(|col| col.name.eq_ignore_ascii_case(&phys.name))
        })
        .collect()
}
