//! # Sheetforge
//!
//! Turns spreadsheet-defined schemas into SQL DDL, typed model code and
//! populated SQLite stores.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Workbook (sheets: names / tags / types / data)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [generator: worker pool]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Table (sorted Columns, Relations, data rows)         │
//! │     via the column builder and the #Relation sheet       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!            ┌─────────────┼──────────────┐
//!            ▼ [sql]       ▼ [value]      ▼ [export]
//!     CREATE / INSERT   typed cells    schema.sql, SQLite db,
//!                                      Rust model structs
//! ```

pub mod config;
pub mod export;
pub mod generator;
pub mod logging;
pub mod schema;
pub mod sql;
pub mod value;
pub mod workbook;

pub use export::{ExportOptions, Exporter, ExporterRegistry};
pub use generator::{Catalog, Generator, Input};
pub use schema::{Column, ColumnType, Table};
