//! Generator error types.

use thiserror::Error;

use crate::schema::{RelationError, SchemaError};
use crate::value::ValueParseError;
use crate::workbook::WorkbookError;

/// Result type for generator operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// A failure scoped to one input, one sheet or the whole run.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The workbook could not be opened or a sheet could not be read.
    #[error("{input}: {source}")]
    Workbook {
        input: String,
        #[source]
        source: WorkbookError,
    },

    /// The relation sheet is malformed.
    #[error("{input}: relation sheet: {source}")]
    Relation {
        input: String,
        #[source]
        source: RelationError,
    },

    /// A table sheet was rejected.
    #[error("{input}: sheet '{sheet}': {source}")]
    Sheet {
        input: String,
        sheet: String,
        #[source]
        source: SchemaError,
    },

    /// Two sheets produced the same table name.
    #[error("{input}: sheet '{sheet}': table '{table}' is already defined by {first}")]
    DuplicateTable {
        input: String,
        sheet: String,
        table: String,
        first: String,
    },

    /// A worker thread panicked.
    #[error("worker thread panicked")]
    WorkerPanicked,

    /// Every failure of a run.
    #[error("{} input error(s): {}", .0.len(), join_errors(.0))]
    Failed(Vec<GenerateError>),
}

fn join_errors(errors: &[GenerateError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single cell that failed to parse. The stored value becomes NULL.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{table}.{column} row {row}: {source}")]
pub struct CellError {
    pub table: String,
    pub column: String,
    /// 1-based sheet row number.
    pub row: usize,
    #[source]
    pub source: ValueParseError,
}
