//! Column builder: header triples to the canonical column list.

use std::collections::BTreeMap;

use tracing::debug;

use super::column::{Column, ColumnRole};
use super::naming::{element_column_name, is_reserved_column_name, normalize_name};
use super::tags::{TagKind, TagSet};
use super::types::{is_array_type, parse_column_type, ColumnType, ScalarKind};
use super::{SchemaError, SchemaResult};

/// One non-empty, non-design header position.
#[derive(Debug)]
struct HeaderField<'a> {
    position: usize,
    name: String,
    type_str: &'a str,
    tags: TagSet,
}

/// Builds the column list of one sheet from its three header rows.
///
/// The three rows are positional: cell `i` of each row describes header
/// position `i`. Rows shorter than the name row are padded with empty cells.
#[derive(Debug, Clone)]
pub struct ColumnBuilder<'a> {
    names: &'a [String],
    tags: &'a [String],
    types: &'a [String],
}

impl<'a> ColumnBuilder<'a> {
    pub fn new(names: &'a [String], tags: &'a [String], types: &'a [String]) -> Self {
        Self { names, tags, types }
    }

    /// Produce the columns, sorted by name.
    ///
    /// Fails when a normalized name is a reserved system column or when two
    /// distinct columns end up with the same name.
    pub fn build(&self) -> SchemaResult<Vec<Column>> {
        let fields = self.header_fields()?;

        let mut columns: BTreeMap<String, Column> = BTreeMap::new();

        // Array groups first: every occurrence of the name with an array type.
        let mut groups: BTreeMap<&str, Vec<&HeaderField<'_>>> = BTreeMap::new();
        for field in fields.iter().filter(|f| is_array_type(f.type_str)) {
            groups.entry(field.name.as_str()).or_default().push(field);
        }

        for (name, occurrences) in &groups {
            let array_type = parse_column_type(occurrences[0].type_str);
            let element_type = array_type
                .base_type()
                .cloned()
                .unwrap_or(ColumnType::Scalar(ScalarKind::String));
            let positions: Vec<usize> = occurrences.iter().map(|f| f.position).collect();

            debug!(column = %name, len = positions.len(), "expanding array column");

            insert_unique(
                &mut columns,
                Column {
                    name: name.to_string(),
                    ty: array_type,
                    tags: TagSet::new(),
                    role: ColumnRole::ArrayAggregate {
                        len: positions.len(),
                    },
                    positions: positions.clone(),
                },
            )?;

            for (index, position) in positions.into_iter().enumerate() {
                insert_unique(
                    &mut columns,
                    Column {
                        name: element_column_name(name, index),
                        ty: element_type.clone(),
                        tags: TagSet::new(),
                        role: ColumnRole::ArrayElement {
                            parent: name.to_string(),
                            index,
                        },
                        positions: vec![position],
                    },
                )?;
            }
        }

        for field in fields.iter().filter(|f| !is_array_type(f.type_str)) {
            if groups.contains_key(field.name.as_str()) {
                debug!(column = %field.name, "scalar occurrence of array field ignored");
                continue;
            }
            insert_unique(
                &mut columns,
                Column::scalar(
                    field.name.clone(),
                    parse_column_type(field.type_str),
                    field.tags.clone(),
                    field.position,
                ),
            )?;
        }

        Ok(columns.into_values().collect())
    }

    /// Normalize names, parse tags and drop design-only and unnamed positions.
    fn header_fields(&self) -> SchemaResult<Vec<HeaderField<'a>>> {
        let mut fields = Vec::new();

        for (position, raw_name) in self.names.iter().enumerate() {
            let raw_name = raw_name.trim();
            if raw_name.is_empty() {
                continue;
            }

            let tags = TagSet::parse(cell(self.tags, position));
            if tags.contains(TagKind::DesignOnly) {
                debug!(column = raw_name, "skipping design-only column");
                continue;
            }

            let name = normalize_name(raw_name);
            if is_reserved_column_name(&name) {
                return Err(SchemaError::ReservedColumnName { name });
            }

            fields.push(HeaderField {
                position,
                name,
                type_str: cell(self.types, position).trim(),
                tags,
            });
        }

        Ok(fields)
    }
}

fn cell(row: &[String], position: usize) -> &str {
    row.get(position).map(String::as_str).unwrap_or("")
}

/// SQLite identifiers are case-insensitive, so `HP` and `Hp` collide.
fn insert_unique(columns: &mut BTreeMap<String, Column>, column: Column) -> SchemaResult<()> {
    if columns.keys().any(|name| name.eq_ignore_ascii_case(&column.name)) {
        return Err(SchemaError::DuplicateColumn { name: column.name });
    }
    columns.insert(column.name.clone(), column);
    Ok(())
}
