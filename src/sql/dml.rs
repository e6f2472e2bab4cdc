//! DML (Data Manipulation Language) support.
//!
//! Only parameterized inserts are needed: rows are bound positionally by the
//! storage sink, never inlined as literals.

use super::token::{Token, TokenStream};

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement with one `?` placeholder per column.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
}

impl Insert {
    /// Create a new INSERT statement.
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Set the columns to insert.
    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = cols.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Number of bind parameters the statement expects.
    pub fn param_count(&self) -> usize {
        self.columns.len()
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(Token::Ident(self.table.clone()));

        ts.space()
            .lparen()
            .comma_separated(self.columns.iter().map(|c| Token::Ident(c.clone())))
            .rparen();

        ts.space()
            .push(Token::Values)
            .space()
            .lparen()
            .comma_separated(self.columns.iter().map(|_| Token::Placeholder))
            .rparen();

        ts
    }
}
