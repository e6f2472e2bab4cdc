//! DDL (Data Definition Language) support.
//!
//! Builders for the CREATE TABLE and CREATE INDEX statements the synthesizer
//! emits. Output is formatted one column clause per line:
//!
//! ```text
//! CREATE TABLE IF NOT EXISTS Item (
//!   id INTEGER PRIMARY KEY AUTOINCREMENT,
//!   Name TEXT NOT NULL UNIQUE
//! )
//! ```

use super::token::{Token, TokenStream};

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE statement.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub if_not_exists: bool,
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
}

impl CreateTable {
    /// Create a new CREATE TABLE statement.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            if_not_exists: false,
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add IF NOT EXISTS clause.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Add a column definition.
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Add multiple column definitions.
    pub fn columns(mut self, cols: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(cols);
        self
    }

    /// Add a table constraint.
    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space().push(Token::Table);
        if self.if_not_exists {
            emit_if_not_exists(&mut ts);
        }
        ts.space().push(Token::Ident(self.name.clone()));

        ts.space().lparen().newline();

        let clauses = self
            .columns
            .iter()
            .map(ColumnDef::to_tokens)
            .chain(self.constraints.iter().map(TableConstraint::to_tokens));

        for (i, clause) in clauses.enumerate() {
            if i > 0 {
                ts.comma().newline();
            }
            ts.indent(1).append(&clause);
        }

        ts.newline().rparen();
        ts
    }
}

// ============================================================================
// Column Definition
// ============================================================================

/// Column definition for CREATE TABLE.
///
/// Constraint clauses are emitted in a fixed order: NOT NULL, PRIMARY KEY
/// (with AUTOINCREMENT), UNIQUE, DEFAULT.
#[derive(Debug, Clone, Default)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub unique: bool,
    /// Default expression, emitted verbatim.
    pub default: Option<String>,
}

impl ColumnDef {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    /// Mark column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Add PRIMARY KEY constraint.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Add AUTOINCREMENT; only emitted together with PRIMARY KEY.
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Add UNIQUE constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set default value. Empty expressions are ignored.
    pub fn default_value(mut self, expr: impl Into<String>) -> Self {
        let expr = expr.into();
        self.default = if expr.is_empty() { None } else { Some(expr) };
        self
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::TypeName(self.data_type.clone()));

        if self.not_null {
            ts.space().push(Token::Not).space().push(Token::Null);
        }

        if self.primary_key {
            ts.space().push(Token::Primary).space().push(Token::Key);
            if self.autoincrement {
                ts.space().push(Token::Autoincrement);
            }
        }

        if self.unique {
            ts.space().push(Token::Unique);
        }

        if let Some(ref expr) = self.default {
            ts.space()
                .push(Token::Default)
                .space()
                .push(Token::Raw(expr.clone()));
        }

        ts
    }
}

// ============================================================================
// Table Constraints
// ============================================================================

/// Table-level constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    ForeignKey {
        columns: Vec<String>,
        references_table: String,
        references_columns: Vec<String>,
    },
}

impl TableConstraint {
    /// Create a FOREIGN KEY constraint.
    pub fn foreign_key(
        columns: impl IntoIterator<Item = impl Into<String>>,
        references_table: impl Into<String>,
        references_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        TableConstraint::ForeignKey {
            columns: columns.into_iter().map(|c| c.into()).collect(),
            references_table: references_table.into(),
            references_columns: references_columns.into_iter().map(|c| c.into()).collect(),
        }
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            TableConstraint::ForeignKey {
                columns,
                references_table,
                references_columns,
            } => {
                ts.push(Token::Foreign).space().push(Token::Key);
                emit_column_list(&mut ts, columns);
                ts.space()
                    .push(Token::References)
                    .space()
                    .push(Token::Ident(references_table.clone()));
                emit_column_list(&mut ts, references_columns);
            }
        }

        ts
    }
}

// ============================================================================
// CREATE INDEX
// ============================================================================

/// CREATE INDEX statement.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateIndex {
    pub if_not_exists: bool,
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
}

impl CreateIndex {
    /// Create a new CREATE INDEX statement.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            if_not_exists: false,
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Index named `idx_<table>_<column>` over a single column.
    pub fn for_column(table: &str, column: &str) -> Self {
        Self::new(format!("idx_{}_{}", table, column), table).column(column)
    }

    /// Add IF NOT EXISTS clause.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Add a column to the index.
    pub fn column(mut self, col: impl Into<String>) -> Self {
        self.columns.push(col.into());
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space().push(Token::Index);

        if self.if_not_exists {
            emit_if_not_exists(&mut ts);
        }

        ts.space().push(Token::Ident(self.name.clone()));
        ts.space()
            .push(Token::On)
            .space()
            .push(Token::Ident(self.table.clone()));
        emit_column_list(&mut ts, &self.columns);

        ts
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn emit_if_not_exists(ts: &mut TokenStream) {
    ts.space()
        .push(Token::If)
        .space()
        .push(Token::Not)
        .space()
        .push(Token::Exists);
}

/// `(a, b, c)` with no leading space.
fn emit_column_list(ts: &mut TokenStream, columns: &[String]) {
    ts.lparen()
        .comma_separated(columns.iter().map(|c| Token::Ident(c.clone())))
        .rparen();
}
