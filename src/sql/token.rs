//! SQL Tokens - the atomic units of SQL output.
//!
//! Statements are assembled as token streams and serialized in one pass, so
//! identifier quoting happens in exactly one place ([`Token::Ident`]).

use super::ident::quote_identifier;

/// SQL Token - every element the synthesizer emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === DDL Keywords ===
    Create,
    Table,
    Index,
    If,
    Not,
    Exists,
    Null,
    Primary,
    Key,
    Autoincrement,
    Foreign,
    References,
    Unique,
    Default,
    On,
    Pragma,

    // === DML Keywords ===
    Insert,
    Into,
    Values,

    // === Punctuation ===
    Comma,
    LParen,
    RParen,
    Eq,
    /// Positional bind parameter.
    Placeholder,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Table, column or index name; quoted when required.
    Ident(String),
    /// Storage type name, emitted as-is.
    TypeName(String),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// Only used for column default expressions taken verbatim from the
    /// sheet's tag row.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string.
    pub fn serialize(&self) -> String {
        match self {
            // DDL keywords
            Token::Create => "CREATE".into(),
            Token::Table => "TABLE".into(),
            Token::Index => "INDEX".into(),
            Token::If => "IF".into(),
            Token::Not => "NOT".into(),
            Token::Exists => "EXISTS".into(),
            Token::Null => "NULL".into(),
            Token::Primary => "PRIMARY".into(),
            Token::Key => "KEY".into(),
            Token::Autoincrement => "AUTOINCREMENT".into(),
            Token::Foreign => "FOREIGN".into(),
            Token::References => "REFERENCES".into(),
            Token::Unique => "UNIQUE".into(),
            Token::Default => "DEFAULT".into(),
            Token::On => "ON".into(),
            Token::Pragma => "PRAGMA".into(),

            // DML keywords
            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),
            Token::Values => "VALUES".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Eq => "=".into(),
            Token::Placeholder => "?".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "  ".repeat(*n),

            // Dynamic
            Token::Ident(name) => quote_identifier(name),
            Token::TypeName(name) => name.clone(),

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Push `items` separated by `, `.
    pub fn comma_separated(&mut self, items: impl IntoIterator<Item = Token>) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.push(item);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(Token::serialize).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
