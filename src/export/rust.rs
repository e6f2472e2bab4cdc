//! Rust exporter: one model struct per table.
//!
//! Output goes to `<output_dir>/rust/<package>/`:
//! - `<table_snake>.rs` with the row struct
//! - `mod.rs` declaring and re-exporting every table module
//! - `fields.json`, the ordered field list of every table for templating

use std::collections::BTreeSet;
use std::fs;

use inflector::Inflector;
use serde::Serialize;
use tracing::info;

use crate::schema::{Column, ColumnRole, FieldSpec, ScalarKind, Table};
use crate::sql::ID_COLUMN;

use super::format::{escape_keyword, SourceWriter};
use super::{io_error, ExportError, ExportOptions, ExportResult, Exporter};

/// Field list manifest file name.
pub const MANIFEST_FILE: &str = "fields.json";

const HEADER: &str = "Generated by sheetforge. Do not edit.";

/// `chrono::DateTime<Utc>` timestamp of 0001-01-01T00:00:00Z.
const ZERO_DATETIME_TIMESTAMP: &str = "-62_135_596_800";

/// Writes typed row structs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustExporter;

#[derive(Serialize)]
struct TableManifest<'a> {
    table: &'a str,
    sheet: &'a str,
    fields: Vec<FieldSpec>,
    array_fields: Vec<FieldSpec>,
}

impl Exporter for RustExporter {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn export(&self, tables: &[Table], options: &ExportOptions) -> ExportResult<()> {
        let dir = options
            .exporter_dir(self.name())
            .join(options.package.to_snake_case());
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        for table in tables {
            field_names(table)?;
        }

        for table in tables {
            let path = dir.join(format!("{}.rs", module_name(table)));
            fs::write(&path, render_table(table)).map_err(io_error(&path))?;
        }

        let mod_path = dir.join("mod.rs");
        fs::write(&mod_path, render_mod(tables)).map_err(io_error(&mod_path))?;

        let manifest: Vec<_> = tables
            .iter()
            .map(|t| TableManifest {
                table: &t.name,
                sheet: &t.sheet_name,
                fields: t.fields(),
                array_fields: t.array_fields(),
            })
            .collect();
        let manifest_path = dir.join(MANIFEST_FILE);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .map_err(io_error(&manifest_path))?;

        info!(path = %dir.display(), tables = tables.len(), "wrote rust models");
        Ok(())
    }
}

/// Module (and file stem) of a table.
pub fn module_name(table: &Table) -> String {
    escape_keyword(table.name.to_snake_case())
}

/// Struct name of a table.
pub fn struct_name(table: &Table) -> String {
    table.name.to_pascal_case()
}

/// Struct field name of a column.
///
/// Element slots are named after their parent so they line up with the
/// aggregate field.
pub fn field_name(column: &Column) -> String {
    match &column.role {
        ColumnRole::ArrayElement { parent, index } => {
            format!("{}_{}", parent.to_snake_case(), index)
        }
        _ => escape_keyword(column.name.to_snake_case()),
    }
}

/// Every struct field of a table, `id` first.
///
/// Fails when two columns map to the same Rust identifier.
pub fn field_names(table: &Table) -> ExportResult<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::with_capacity(table.columns.len() + 1);
    for field in std::iter::once(ID_COLUMN.to_string()).chain(table.columns.iter().map(field_name)) {
        if !seen.insert(field.clone()) {
            return Err(ExportError::DuplicateField {
                table: table.name.clone(),
                field,
            });
        }
        names.push(field);
    }
    Ok(names)
}

/// Closure body testing a borrowed slot value (`&&T`) for non-zero.
fn non_zero_test(kind: ScalarKind) -> String {
    match kind {
        ScalarKind::Int32 | ScalarKind::Int64 => "**v != 0".to_string(),
        ScalarKind::Float64 => "**v != 0.0".to_string(),
        ScalarKind::Bool => "**v".to_string(),
        ScalarKind::String | ScalarKind::Bytes => "!v.is_empty()".to_string(),
        ScalarKind::DateTime => format!("v.timestamp() != {}", ZERO_DATETIME_TIMESTAMP),
    }
}

/// Source of one table module.
pub fn render_table(table: &Table) -> String {
    let name = struct_name(table);
    let mut w = SourceWriter::new();

    w.write_comment(HEADER);
    w.blank_line();
    w.write_doc(&format!("Row of table `{}` (sheet `{}`).", table.name, table.sheet_name));
    w.write_line("#[derive(Debug, Clone, PartialEq, Default)]");
    w.write_line(&format!("pub struct {} {{", name));
    w.indent();
    w.write_doc(&format!("`{}`: INTEGER PRIMARY KEY AUTOINCREMENT", ID_COLUMN));
    w.write_line(&format!("pub {}: i64,", ID_COLUMN));
    for column in &table.columns {
        let tags = column.tag_string();
        if tags.is_empty() {
            w.write_doc(&format!("`{}`: {}", column.name, column.sql_type()));
        } else {
            w.write_doc(&format!("`{}`: {}, tags `{}`", column.name, column.sql_type(), tags));
        }
        w.write_line(&format!(
            "pub {}: Option<{}>,",
            field_name(column),
            column.ty.code_type_string()
        ));
    }
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line(&format!("impl {} {{", name));
    w.indent();
    w.write_line(&format!("pub const TABLE: &'static str = {:?};", table.name));
    w.blank_line();
    w.write_doc("Insert column order.");
    w.write_line("pub const COLUMNS: &'static [&'static str] = &[");
    w.indent();
    for column in &table.columns {
        w.write_line(&format!("{:?},", column.name));
    }
    w.dedent();
    w.write_line("];");

    for column in table.columns.iter().filter(|c| c.is_array_aggregate()) {
        render_slot_accessor(&mut w, table, column);
    }
    w.dedent();
    w.write_line("}");

    w.into_string()
}

fn render_slot_accessor(w: &mut SourceWriter, table: &Table, aggregate: &Column) {
    let len = aggregate.array_len().unwrap_or(0);
    let kind = aggregate.ty.scalar_kind();
    let base = aggregate
        .ty
        .base_type()
        .map(|b| b.code_type_string())
        .unwrap_or_else(|| kind.code_type().to_string());

    let mut slots = table
        .columns
        .iter()
        .filter_map(|c| match &c.role {
            ColumnRole::ArrayElement { parent, index } if *parent == aggregate.name => {
                Some((*index, field_name(c)))
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    slots.sort_by_key(|(index, _)| *index);

    let refs = slots
        .iter()
        .map(|(_, field)| format!("&self.{}", field))
        .collect::<Vec<_>>()
        .join(", ");

    w.blank_line();
    w.write_doc(&format!(
        "`{}` rebuilt from its {} element slots, up to the first empty slot.",
        aggregate.name, len
    ));
    w.write_line(&format!(
        "pub fn {}_from_slots(&self) -> Vec<{}> {{",
        field_name(aggregate).trim_start_matches("r#"),
        base
    ));
    w.indent();
    w.write_line(&format!("let slots: [&Option<{}>; {}] = [{}];", base, len, refs));
    w.write_line("slots");
    w.indent();
    w.write_line(".into_iter()");
    w.write_line(&format!(
        ".map_while(|slot| slot.as_ref().filter(|v| {}).cloned())",
        non_zero_test(kind)
    ));
    w.write_line(".collect()");
    w.dedent();
    w.dedent();
    w.write_line("}");
}

/// Source of the package `mod.rs`.
pub fn render_mod(tables: &[Table]) -> String {
    let mut w = SourceWriter::new();
    w.write_comment(HEADER);
    w.blank_line();
    for table in tables {
        w.write_line(&format!("pub mod {};", module_name(table)));
    }
    if !tables.is_empty() {
        w.blank_line();
    }
    for table in tables {
        w.write_line(&format!("pub use {}::{};", module_name(table), struct_name(table)));
    }
    w.into_string()
}
