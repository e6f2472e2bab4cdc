//! Exporters: turn a table catalog into files on disk.
//!
//! Exporters are looked up by name in an [`ExporterRegistry`] built once by
//! the caller. Each exporter writes below `<output_dir>/<exporter name>`.

pub mod format;
pub mod rust;
pub mod sqlite;

pub use rust::{RustExporter, MANIFEST_FILE};
pub use sqlite::{SqliteExporter, SCHEMA_FILE};

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::info;

use crate::schema::Table;

/// Errors raised by exporters.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table '{table}' maps two columns to field '{field}'")]
    DuplicateField { table: String, field: String },

    #[error("unknown exporter '{name}', available: {available}")]
    UnknownExporter { name: String, available: String },

    #[error("exporter '{exporter}' failed on table '{table}': {source}")]
    Table {
        exporter: String,
        table: String,
        #[source]
        source: Box<ExportError>,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;

pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> ExportError {
    let path = path.into();
    move |source| ExportError::Io { path, source }
}

/// Options shared by every exporter of a run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output root.
    pub output_dir: PathBuf,
    /// Package / module name.
    pub package: String,
    /// SQLite database file name.
    pub db_name: String,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            package: "models".to_string(),
            db_name: "app.db".to_string(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Directory owned by one exporter.
    pub fn exporter_dir(&self, exporter: &str) -> PathBuf {
        self.output_dir.join(exporter)
    }
}

/// A named output format.
pub trait Exporter: Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Write every table. Tables arrive sorted by name.
    fn export(&self, tables: &[Table], options: &ExportOptions) -> ExportResult<()>;
}

/// Exporters by name.
#[derive(Default)]
pub struct ExporterRegistry {
    exporters: BTreeMap<&'static str, Box<dyn Exporter>>,
}

impl ExporterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in exporters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SqliteExporter);
        registry.register(RustExporter);
        registry
    }

    /// Register an exporter, replacing any previous one of the same name.
    pub fn register(&mut self, exporter: impl Exporter + 'static) -> &mut Self {
        self.exporters.insert(exporter.name(), Box::new(exporter));
        self
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.exporters.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Exporter> {
        self.exporters.get(name).map(|e| e.as_ref())
    }

    /// Run one exporter by name.
    pub fn export(&self, name: &str, tables: &[Table], options: &ExportOptions) -> ExportResult<()> {
        let exporter = self.get(name).ok_or_else(|| ExportError::UnknownExporter {
            name: name.to_string(),
            available: self.names().join(", "),
        })?;

        info!(exporter = name, tables = tables.len(), "exporting");
        exporter.export(tables, options)
    }

    /// Run every registered exporter in name order.
    pub fn export_all(&self, tables: &[Table], options: &ExportOptions) -> ExportResult<()> {
        for name in self.names() {
            self.export(name, tables, options)?;
        }
        Ok(())
    }

    /// Resolve a user selection: `all` or a comma-separated list of names.
    pub fn resolve(&self, selection: &str) -> ExportResult<Vec<&'static str>> {
        if selection.trim().eq_ignore_ascii_case("all") {
            return Ok(self.names());
        }

        let mut names = Vec::new();
        for name in selection.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, _) = self
                .exporters
                .get_key_value(name)
                .ok_or_else(|| ExportError::UnknownExporter {
                    name: name.to_string(),
                    available: self.names().join(", "),
                })?;
            if !names.contains(key) {
                names.push(*key);
            }
        }
        Ok(names)
    }
}
