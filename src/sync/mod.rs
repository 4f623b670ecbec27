//! The export pipeline and the import read path.
//!
//! Export flows through a fixed pipeline: build DDL from the logical
//! columns ([`ddl`]), recreate the table, re-read the physical schema,
//! align physical to logical columns by name ([`reconcile`]), then format
//! ([`format`]) and project ([`project`]) every record into one transaction
//! of inserts ([`export`]). Import ([`import`]) runs a SQL statement once
//! and exposes the captured result set as a single-pass cursor.
//!
//! # Submodules
//!
//! - [`format`] - Type-directed value normalization
//! - [`ddl`] - CREATE TABLE generation
//! - [`reconcile`] - Physical-to-logical column matching
//! - [`project`] - Per-record row projection
//! - [`export`] - Sync engine and exporter facade
//! - [`import`] - Query capture, cursor and importer facade
//! - [`types`] - Shared stats and column kinds

pub mod ddl;
pub mod export;
pub mod format;
pub mod import;
pub mod project;
pub mod reconcile;
pub mod types;

pub use export::{ExportOutcome, GridExporter, TableSyncEngine};
pub use import::{GridImporter, ImportOutcome, QueryRecord, QueryRecords};
pub use types::{ColumnKind, ExportStats, QueryColumn};
