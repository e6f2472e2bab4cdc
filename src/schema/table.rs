//! Tables: a sheet's column model, its relations and its data rows.

use serde::Serialize;
use tracing::debug;

use super::builder::ColumnBuilder;
use super::column::Column;
use super::naming::normalize_name;
use super::relation::Relation;
use super::{SchemaError, SchemaResult};

/// Header rows preceding the data: names, tags, types.
pub const HEADER_ROWS: usize = 3;

/// Minimum row count of a table sheet: the header plus one data row.
pub const MIN_SHEET_ROWS: usize = HEADER_ROWS + 1;

/// Whether a sheet holds metadata rather than a table.
pub fn is_metadata_sheet(sheet_name: &str) -> bool {
    sheet_name.starts_with('#')
}

/// A table derived from one sheet.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub sheet_name: String,
    /// Sorted by name.
    pub columns: Vec<Column>,
    pub relations: Vec<Relation>,
    /// Non-blank data rows, paired with their 1-based sheet row number.
    pub rows: Vec<(usize, Vec<String>)>,
}

/// One field as seen by code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub code_type: String,
    pub sql_type: String,
    pub tags: String,
    /// Element count for array aggregates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_len: Option<usize>,
}

impl Table {
    /// Build a table from the raw rows of a sheet.
    pub fn from_sheet(sheet_name: &str, rows: &[Vec<String>]) -> SchemaResult<Self> {
        if rows.len() < MIN_SHEET_ROWS {
            return Err(SchemaError::TooFewRows {
                sheet: sheet_name.to_string(),
                rows: rows.len(),
            });
        }

        let (names, tags, types) = (&rows[0], &rows[1], &rows[2]);
        if names.iter().all(|n| n.trim().is_empty()) {
            return Err(SchemaError::EmptyHeader {
                sheet: sheet_name.to_string(),
            });
        }

        let columns = ColumnBuilder::new(names, tags, types).build()?;

        let data = rows
            .iter()
            .enumerate()
            .skip(HEADER_ROWS)
            .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|(i, row)| (i + 1, row.clone()))
            .collect::<Vec<_>>();

        let name = normalize_name(sheet_name);
        debug!(
            table = %name,
            columns = columns.len(),
            rows = data.len(),
            "built table"
        );

        Ok(Self {
            name,
            sheet_name: sheet_name.to_string(),
            columns,
            relations: Vec::new(),
            rows: data,
        })
    }

    /// Column by name, ignoring ASCII case like SQLite does.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Relations that produce a foreign key on this table.
    pub fn belongs_to(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(|r| r.is_belongs_to())
    }

    /// Ordered field list handed to code generation.
    pub fn fields(&self) -> Vec<FieldSpec> {
        self.columns.iter().map(field_spec).collect()
    }

    /// The array aggregate subset of [`Table::fields`].
    pub fn array_fields(&self) -> Vec<FieldSpec> {
        self.columns
            .iter()
            .filter(|c| c.is_array_aggregate())
            .map(field_spec)
            .collect()
    }
}

fn field_spec(column: &Column) -> FieldSpec {
    FieldSpec {
        name: column.name.clone(),
        code_type: column.ty.code_type_string(),
        sql_type: column.sql_type().to_string(),
        tags: column.tag_string(),
        array_len: column.array_len(),
    }
}

/// Attach each relation to the table named by its source, by exact match.
///
/// Relations whose source matches no table are dropped.
pub fn attach_relations(tables: &mut [Table], relations: Vec<Relation>) {
    for relation in relations {
        match tables
            .iter_mut()
            .find(|t| t.name == relation.source_table)
        {
            Some(table) => table.relations.push(relation),
            None => debug!(
                source = %relation.source_table,
                target = %relation.target_table,
                "relation source matches no table, dropped"
            ),
        }
    }
}
