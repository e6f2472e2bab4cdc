//! Type registry: declared type strings, semantic column types and their
//! storage / code-level spellings.
//!
//! There is exactly one registry. Every consumer (column builder, value
//! parsers, DDL synthesis, code generation) goes through [`parse_column_type`]
//! and the accessors on [`ColumnType`].

use std::fmt;

/// Scalar kinds a column (or an array element) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Int32,
    Int64,
    Float64,
    Bool,
    String,
    DateTime,
    Bytes,
}

impl ScalarKind {
    /// Storage (SQL) type for this kind.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ScalarKind::Int32 => "INTEGER",
            ScalarKind::Int64 => "BIGINT",
            ScalarKind::Float64 => "REAL",
            ScalarKind::Bool => "BOOLEAN",
            ScalarKind::String => "TEXT",
            ScalarKind::DateTime => "DATETIME",
            ScalarKind::Bytes => "BLOB",
        }
    }

    /// Rust type used by generated model code.
    pub fn code_type(&self) -> &'static str {
        match self {
            ScalarKind::Int32 => "i32",
            ScalarKind::Int64 => "i64",
            ScalarKind::Float64 => "f64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "String",
            ScalarKind::DateTime => "chrono::DateTime<chrono::Utc>",
            ScalarKind::Bytes => "Vec<u8>",
        }
    }

    /// Match a lower-cased, trimmed token against the synonym table.
    ///
    /// Unknown tokens degrade to [`ScalarKind::String`].
    fn from_token(token: &str) -> Self {
        match token {
            "int" | "int32" | "integer" => ScalarKind::Int32,
            "int64" | "bigint" => ScalarKind::Int64,
            "float" | "float64" | "double" => ScalarKind::Float64,
            "bool" | "boolean" => ScalarKind::Bool,
            "time" | "datetime" | "timestamp" | "date" => ScalarKind::DateTime,
            "[]byte" | "blob" => ScalarKind::Bytes,
            "string" | "text" | "varchar" => ScalarKind::String,
            _ => ScalarKind::String,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float64 => "float64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// Semantic column type.
///
/// An array owns its element type; the element is always a scalar because
/// [`parse_column_type`] only accepts one level of `array<...>` before falling
/// back to the permissive scalar table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Scalar(ScalarKind),
    Array(Box<ColumnType>),
}

impl ColumnType {
    pub fn is_array(&self) -> bool {
        matches!(self, ColumnType::Array(_))
    }

    /// Element type of an array, `None` for scalars.
    pub fn base_type(&self) -> Option<&ColumnType> {
        match self {
            ColumnType::Array(base) => Some(base),
            ColumnType::Scalar(_) => None,
        }
    }

    /// The scalar kind at the bottom of this type.
    pub fn scalar_kind(&self) -> ScalarKind {
        match self {
            ColumnType::Scalar(kind) => *kind,
            ColumnType::Array(base) => base.scalar_kind(),
        }
    }

    /// Storage type string. Arrays are JSON-encoded and always stored as TEXT.
    pub fn sql_type_string(&self) -> &'static str {
        match self {
            ColumnType::Scalar(kind) => kind.sql_type(),
            ColumnType::Array(_) => "TEXT",
        }
    }

    /// Type string used by generated model code.
    pub fn code_type_string(&self) -> String {
        match self {
            ColumnType::Scalar(kind) => kind.code_type().to_string(),
            ColumnType::Array(base) => format!("Vec<{}>", base.code_type_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Scalar(kind) => write!(f, "{}", kind),
            ColumnType::Array(base) => write!(f, "array<{}>", base),
        }
    }
}

/// Parse a declared type string.
///
/// Lower-cases and trims the input, unwraps `array<X>` and parses `X` as a
/// scalar. Never fails: anything unrecognized becomes `String`, and a nested
/// `array<array<X>>` element degrades to `String` as an unknown scalar token.
pub fn parse_column_type(type_str: &str) -> ColumnType {
    let normalized = type_str.trim().to_lowercase();

    match array_inner(&normalized) {
        Some(inner) => {
            let inner = inner.trim();
            let kind = if array_inner(inner).is_some() {
                ScalarKind::String
            } else {
                ScalarKind::from_token(inner)
            };
            ColumnType::Array(Box::new(ColumnType::Scalar(kind)))
        }
        None => ColumnType::Scalar(ScalarKind::from_token(&normalized)),
    }
}

/// Inner text of `array<...>`, if the (already lower-cased) string has that shape.
fn array_inner(s: &str) -> Option<&str> {
    s.strip_prefix("array<")?.strip_suffix('>')
}

/// Whether a raw declared type string denotes an array.
pub fn is_array_type(type_str: &str) -> bool {
    array_inner(&type_str.trim().to_lowercase()).is_some()
}
