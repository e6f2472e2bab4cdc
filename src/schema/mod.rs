//! Schema model: types, tags, columns, relations and tables.
//!
//! A sheet's three header rows (names, tags, declared types) are turned into
//! a sorted list of [`Column`]s by the [`ColumnBuilder`]. Array-typed fields
//! are flattened into one JSON aggregate column plus one column per element
//! slot. Everything downstream (DDL, inserts, row conversion, generated code)
//! reads this single model.

pub mod builder;
pub mod column;
pub mod naming;
pub mod relation;
pub mod table;
pub mod tags;
pub mod types;

pub use builder::ColumnBuilder;
pub use column::{Column, ColumnRole};
pub use naming::normalize_name;
pub use relation::{parse_relations, Relation, RelationError, RelationType, RELATION_SHEET};
pub use table::{attach_relations, is_metadata_sheet, FieldSpec, Table};
pub use tags::{Tag, TagKind, TagSet};
pub use types::{parse_column_type, ColumnType, ScalarKind};

/// Table-level schema errors. Any of these aborts the affected sheet.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("column name '{name}' is reserved by the system")]
    ReservedColumnName { name: String },

    #[error("duplicate column '{name}' after name normalization")]
    DuplicateColumn { name: String },

    #[error("sheet '{sheet}' has {rows} rows, at least 4 are required")]
    TooFewRows { sheet: String, rows: usize },

    #[error("sheet '{sheet}' has an empty name row")]
    EmptyHeader { sheet: String },
}

pub type SchemaResult<T> = Result<T, SchemaError>;
