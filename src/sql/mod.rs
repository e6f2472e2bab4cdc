//! SQL generation module.
//!
//! - [`token`] - Token types for SQL generation
//! - [`ident`] - Identifier quoting
//! - [`ddl`] - CREATE TABLE / CREATE INDEX builders
//! - [`dml`] - Parameterized INSERT builder
//! - [`synth`] - Statements derived from a [`Table`](crate::schema::Table)

pub mod ddl;
pub mod dml;
pub mod ident;
pub mod synth;
pub mod token;

pub use ddl::{ColumnDef, CreateIndex, CreateTable, TableConstraint};
pub use dml::Insert;
pub use ident::quote_identifier;
pub use synth::{pragma, pragma_foreign_keys, schema_script, synthesize, TableSql, ID_COLUMN};
pub use token::{Token, TokenStream};
