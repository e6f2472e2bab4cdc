//! Statement synthesis from the table model.
//!
//! CREATE TABLE, CREATE INDEX and INSERT text for a [`Table`] are all derived
//! from the same sorted column list, so the insert column order always matches
//! the DDL and the row values produced by row conversion.

use tracing::debug;

use crate::schema::{Column, TagKind, Table};

use super::ddl::{ColumnDef, CreateIndex, CreateTable, TableConstraint};
use super::dml::Insert;
use super::token::{Token, TokenStream};

/// Name of the implicit primary key column.
pub const ID_COLUMN: &str = "id";

/// Every statement derived from one table.
#[derive(Debug, Clone)]
pub struct TableSql {
    pub table: String,
    pub create_table: String,
    pub create_indexes: Vec<String>,
    pub insert: String,
    /// Column names in insert (and DDL) order.
    pub insert_columns: Vec<String>,
}

impl TableSql {
    /// DDL statements in execution order, without terminators.
    pub fn ddl(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.create_table.as_str())
            .chain(self.create_indexes.iter().map(String::as_str))
    }
}

/// Synthesize all statements for a table.
pub fn synthesize(table: &Table) -> TableSql {
    let create = create_table(table).to_sql();
    let indexes = create_indexes(table)
        .iter()
        .map(CreateIndex::to_sql)
        .collect::<Vec<_>>();
    let insert = insert(table);

    debug!(table = %table.name, sql = %create, "synthesized table");

    TableSql {
        table: table.name.clone(),
        create_table: create,
        create_indexes: indexes,
        insert: insert.to_sql(),
        insert_columns: insert.columns,
    }
}

/// Column definition for one model column.
///
/// The implicit `id` is the table's primary key; a `primaryKey` tag on a
/// sheet column adds no constraint.
pub fn column_def(column: &Column) -> ColumnDef {
    let mut def = ColumnDef::new(column.name.clone(), column.sql_type());

    if column.tags.contains(TagKind::NotNull) {
        def = def.not_null();
    }
    if column.is_unique() {
        def = def.unique();
    }
    if let Some(value) = column.tags.value(TagKind::Default) {
        def = def.default_value(value);
    }

    def
}

/// CREATE TABLE IF NOT EXISTS with the implicit `id`, every column and one
/// foreign key per `belongsTo` relation.
///
/// A foreign key column missing from the sheet is declared as INTEGER right
/// after `id`.
pub fn create_table(table: &Table) -> CreateTable {
    let mut create = CreateTable::new(table.name.clone())
        .if_not_exists()
        .column(
            ColumnDef::new(ID_COLUMN, "INTEGER")
                .primary_key()
                .autoincrement(),
        );

    let mut implicit = Vec::new();
    for relation in table.belongs_to() {
        let fk = &relation.foreign_key;
        let declared = implicit.iter().any(|name: &String| name.eq_ignore_ascii_case(fk));
        if table.column(fk).is_none() && !declared {
            implicit.push(fk.clone());
        }
    }
    create = create.columns(implicit.into_iter().map(|fk| ColumnDef::new(fk, "INTEGER")));

    create = create.columns(table.columns.iter().map(column_def));

    for relation in table.belongs_to() {
        create = create.constraint(TableConstraint::foreign_key(
            [relation.foreign_key.clone()],
            relation.target_table.clone(),
            [ID_COLUMN],
        ));
    }

    create
}

/// One index per `index`-tagged column, then one per `belongsTo` foreign key.
pub fn create_indexes(table: &Table) -> Vec<CreateIndex> {
    let columns = table
        .columns
        .iter()
        .filter(|c| c.is_indexed())
        .map(|c| c.name.as_str());
    let foreign_keys = table.belongs_to().map(|r| r.foreign_key.as_str());

    let mut indexes: Vec<CreateIndex> = Vec::new();
    for column in columns.chain(foreign_keys) {
        let index = CreateIndex::for_column(&table.name, column).if_not_exists();
        if indexes
            .iter()
            .all(|existing| !existing.name.eq_ignore_ascii_case(&index.name))
        {
            indexes.push(index);
        }
    }
    indexes
}

/// Parameterized insert over every model column, in model order.
pub fn insert(table: &Table) -> Insert {
    Insert::into(table.name.clone()).columns(table.columns.iter().map(|c| c.name.clone()))
}

/// `PRAGMA <name>=<value>`
pub fn pragma(name: &str, value: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Pragma)
        .space()
        .push(Token::Raw(name.into()))
        .push(Token::Eq)
        .push(Token::Raw(value.into()));
    ts.serialize()
}

/// `PRAGMA foreign_keys=ON`
pub fn pragma_foreign_keys() -> String {
    pragma("foreign_keys", "ON")
}

/// Complete schema script for a set of tables.
pub fn schema_script(tables: &[Table]) -> String {
    let mut out = String::from("-- Schema generated by sheetforge\n\n");
    out.push_str(&pragma_foreign_keys());
    out.push_str(";\n\n");

    for table in tables {
        let sql = synthesize(table);
        for statement in sql.ddl() {
            out.push_str(statement);
            out.push_str(";\n");
        }
        out.push('\n');
    }

    out
}
