//! SQLite exporter: a schema script plus a populated database.

use std::fs;

use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info, warn};

use crate::generator::RowConverter;
use crate::schema::Table;
use crate::sql::{pragma, pragma_foreign_keys, schema_script, synthesize};

use super::{io_error, ExportError, ExportOptions, ExportResult, Exporter};

/// Schema script file name.
pub const SCHEMA_FILE: &str = "schema.sql";

/// Writes `schema.sql` and `<db_name>` into `<output_dir>/sqlite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteExporter;

impl Exporter for SqliteExporter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn export(&self, tables: &[Table], options: &ExportOptions) -> ExportResult<()> {
        let dir = options.exporter_dir(self.name());
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let schema_path = dir.join(SCHEMA_FILE);
        fs::write(&schema_path, schema_script(tables)).map_err(io_error(&schema_path))?;
        info!(path = %schema_path.display(), "wrote schema");

        let db_path = dir.join(&options.db_name);
        if db_path.exists() {
            fs::remove_file(&db_path).map_err(io_error(&db_path))?;
        }

        let mut conn = Connection::open(&db_path)?;
        let inserted = populate(&mut conn, tables)?;
        info!(path = %db_path.display(), rows = inserted, "wrote database");

        Ok(())
    }
}

/// Create every table, then insert every row, in a single transaction.
///
/// All DDL runs before the first insert so that rows may reference tables
/// later in name order. Returns the number of inserted rows.
pub fn populate(conn: &mut Connection, tables: &[Table]) -> ExportResult<usize> {
    conn.execute_batch(&pragma_foreign_keys())?;

    let tx = conn.transaction()?;
    // Row order across tables is arbitrary; check references at commit.
    tx.execute_batch(&pragma("defer_foreign_keys", "ON"))?;

    let statements: Vec<_> = tables.iter().map(synthesize).collect();
    for sql in &statements {
        for statement in sql.ddl() {
            debug!(table = %sql.table, sql = statement, "executing");
            tx.execute(statement, [])?;
        }
    }

    let mut inserted = 0;
    for (table, sql) in tables.iter().zip(&statements) {
        let converter = RowConverter::new(table);
        let mut stmt = tx.prepare(&sql.insert)?;
        for row in converter.convert_all(table) {
            if !row.errors.is_empty() {
                warn!(
                    table = %table.name,
                    row = row.row,
                    errors = row.errors.len(),
                    "row stored with NULL cells"
                );
            }
            stmt.execute(params_from_iter(row.values.iter()))
                .map_err(|e| ExportError::Table {
                    exporter: "sqlite".to_string(),
                    table: table.name.clone(),
                    source: Box::new(ExportError::Sqlite(e)),
                })?;
            inserted += 1;
        }
    }

    tx.commit()?;
    Ok(inserted)
}
