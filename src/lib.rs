//! gridbridge - a two-way bridge between host grid data and SQLite tables.
//!
//! On export, a stream of typed, named records is materialized as a freshly
//! recreated database table: column types are derived from the host's logical
//! column metadata, values are normalized per type, and all rows are inserted
//! inside a single transaction. On import, an arbitrary SQL statement is
//! executed once and its result set is exposed back to the host as a
//! single-pass record stream.
//!
//! # Architecture
//!
//! - [`config`] - Host-level settings, defaults and validation
//! - [`model`] - Logical columns, records and numeric culture
//! - [`storage`] - Connection sessions and live schema introspection
//! - [`sync`] - Export pipeline and import read path
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;

pub use config::{ExportSettings, ImportSettings};
pub use error::{Error, Result};
pub use model::{Culture, DeclaredType, Field, GridRecord, LogicalColumn, NativeValue};
pub use sync::export::{ExportOutcome, GridExporter};
pub use sync::import::{GridImporter, ImportOutcome, QueryRecords};
