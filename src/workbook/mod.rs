//! Workbook input: named sheets of string rows.
//!
//! The generator only sees the [`Workbook`] trait. Two implementations ship
//! with the crate: [`MemoryWorkbook`] for embedding and tests, and
//! [`CsvWorkbook`] which reads a directory of CSV files (one per sheet) or a
//! single CSV file.

mod csv;

pub use self::csv::CsvWorkbook;

use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while opening or reading a workbook.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("unsupported workbook: {0}")]
    Unsupported(PathBuf),
}

pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// A source of named sheets.
pub trait Workbook: Send {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Every row of a sheet. Rows may have different lengths.
    fn rows(&self, sheet: &str) -> WorkbookResult<Vec<Vec<String>>>;
}

/// A workbook held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet.
    pub fn sheet<R, C>(mut self, name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.sheets.push((name.into(), rows));
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn rows(&self, sheet: &str) -> WorkbookResult<Vec<Vec<String>>> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))
    }
}

/// Open the workbook at `path`: a directory of CSV sheets or a single CSV file.
pub fn open_workbook(path: &Path) -> WorkbookResult<Box<dyn Workbook>> {
    if path.is_dir() || is_csv_file(path) {
        Ok(Box::new(CsvWorkbook::open(path)?))
    } else {
        Err(WorkbookError::Unsupported(path.to_path_buf()))
    }
}

/// Editor lock files and hidden entries are never workbooks.
pub fn is_skipped_name(name: &str) -> bool {
    name.starts_with("~$") || name.starts_with('.')
}

fn is_csv_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Workbooks directly inside `dir`, sorted by path.
///
/// Subdirectories are directory workbooks; `.csv` files are single-sheet
/// workbooks.
pub fn discover_workbooks(dir: &Path) -> WorkbookResult<Vec<PathBuf>> {
    let io_err = |source| WorkbookError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let skipped = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, is_skipped_name);
        if skipped {
            continue;
        }
        if path.is_dir() || is_csv_file(&path) {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}
