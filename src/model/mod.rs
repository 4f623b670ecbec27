//! Data types describing the host's grid model.
//!
//! The host supplies an ordered list of [`LogicalColumn`]s and a stream of
//! records implementing [`GridRecord`] for the duration of one export call.
//! Everything here is plain data; the database-side counterparts live in
//! [`crate::storage`].
//!
//! # Submodules
//!
//! - [`column`] - Logical columns, declared types and storage classes
//! - [`record`] - Record access, native values and numeric culture

pub mod column;
pub mod record;

pub use column::{ColumnOrigin, DeclaredType, LogicalColumn, StorageClass};
pub use record::{Culture, Field, GridRecord, NativeValue};
