//! CSV-backed workbooks.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::debug;

use super::{is_skipped_name, Workbook, WorkbookError, WorkbookResult};

/// Sheets stored as CSV files; the file stem is the sheet name.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    path: PathBuf,
    sheets: Vec<(String, PathBuf)>,
}

impl CsvWorkbook {
    /// Open a directory of `*.csv` sheets or a single CSV file.
    ///
    /// Sheets are ordered by file name. Files are read lazily by
    /// [`Workbook::rows`].
    pub fn open(path: &Path) -> WorkbookResult<Self> {
        let sheets: Vec<(String, PathBuf)> = if path.is_dir() {
            let io_err = |source| WorkbookError::Io {
                path: path.to_path_buf(),
                source,
            };

            let mut files = Vec::new();
            for entry in fs::read_dir(path).map_err(io_err)? {
                let file = entry.map_err(io_err)?.path();
                let is_csv = file
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
                if file.is_file() && is_csv {
                    files.push(file);
                }
            }
            files.sort();

            files
                .into_iter()
                .filter_map(|file| sheet_entry(&file))
                .collect()
        } else {
            sheet_entry(path).into_iter().collect()
        };

        debug!(path = %path.display(), sheets = ?sheet_names(&sheets), "opened workbook");

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn sheet_entry(file: &Path) -> Option<(String, PathBuf)> {
    let stem = file.file_stem()?.to_str()?;
    if is_skipped_name(stem) {
        return None;
    }
    Some((stem.to_string(), file.to_path_buf()))
}

fn sheet_names(sheets: &[(String, PathBuf)]) -> Vec<&str> {
    sheets.iter().map(|(name, _)| name.as_str()).collect()
}

impl Workbook for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn rows(&self, sheet: &str) -> WorkbookResult<Vec<Vec<String>>> {
        let (_, file) = self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet.to_string()))?;

        let csv_err = |source| WorkbookError::Csv {
            path: file.clone(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(file)
            .map_err(csv_err)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(rows)
    }
}
