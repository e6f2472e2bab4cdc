//! Row conversion: raw data rows to storage values in insert order.

use tracing::warn;

use crate::schema::Table;
use crate::value::{Value, ValueParser};

use super::error::CellError;

/// How one insert column is read from a raw row.
#[derive(Debug, Clone)]
struct ColumnPlan {
    name: String,
    parser: ValueParser,
    /// Header positions; several for an array aggregate.
    positions: Vec<usize>,
}

/// A converted row, positionally aligned with the table's insert columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRow {
    /// 1-based sheet row number.
    pub row: usize,
    pub values: Vec<Value>,
    pub errors: Vec<CellError>,
}

/// Converts the data rows of one table.
///
/// Parsers are chosen once, when the converter is built.
#[derive(Debug, Clone)]
pub struct RowConverter {
    table: String,
    plans: Vec<ColumnPlan>,
}

impl RowConverter {
    pub fn new(table: &Table) -> Self {
        let plans = table
            .columns
            .iter()
            .map(|column| ColumnPlan {
                name: column.name.clone(),
                parser: ValueParser::for_type(&column.ty),
                positions: column.positions.clone(),
            })
            .collect();

        Self {
            table: table.name.clone(),
            plans,
        }
    }

    /// Convert one raw row.
    ///
    /// An array aggregate joins its element cells with `,` before parsing.
    /// Cells that fail to parse are logged and stored as `Null`.
    pub fn convert(&self, row_number: usize, row: &[String]) -> ConvertedRow {
        let mut values = Vec::with_capacity(self.plans.len());
        let mut errors = Vec::new();

        for plan in &self.plans {
            let raw = match plan.positions.as_slice() {
                [position] => cell(row, *position).to_string(),
                positions => positions
                    .iter()
                    .map(|p| cell(row, *p))
                    .collect::<Vec<_>>()
                    .join(","),
            };

            match plan.parser.parse(&raw) {
                Ok(value) => values.push(value),
                Err(source) => {
                    let error = CellError {
                        table: self.table.clone(),
                        column: plan.name.clone(),
                        row: row_number,
                        source,
                    };
                    warn!("{}; storing NULL", error);
                    errors.push(error);
                    values.push(Value::Null);
                }
            }
        }

        ConvertedRow {
            row: row_number,
            values,
            errors,
        }
    }

    /// Convert every data row of `table`.
    pub fn convert_all(&self, table: &Table) -> Vec<ConvertedRow> {
        table
            .rows
            .iter()
            .map(|(row_number, row)| self.convert(*row_number, row))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.plans.len()
    }
}

fn cell(row: &[String], position: usize) -> &str {
    row.get(position).map(String::as_str).unwrap_or("")
}
