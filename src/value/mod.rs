//! Typed cell values and the parsers producing them.
//!
//! A [`ValueParser`] is chosen once per column from its [`ColumnType`](crate::schema::ColumnType) and
//! turns raw cell text into a [`Value`]. Array aggregates are parsed from a
//! comma-separated cell, keep only their non-zero elements and are stored as
//! a JSON array.

pub mod array;
pub mod datetime;
pub mod parser;

pub use array::{decode_array, encode_array, expand_slots, reconstruct};
pub use datetime::{parse_datetime, zero_datetime};
pub use parser::ValueParser;

use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue};

use crate::schema::ScalarKind;

/// Errors raised while converting a single cell.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueParseError {
    #[error("invalid {kind} value '{value}': {reason}")]
    Invalid {
        kind: ScalarKind,
        value: String,
        reason: String,
    },

    #[error("invalid array encoding '{value}': {reason}")]
    ArrayEncoding { value: String, reason: String },
}

pub type ValueResult<T> = Result<T, ValueParseError>;

/// A typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    String(String),
    DateTime(DateTime<Utc>),
    Bytes(Vec<u8>),
    /// Elements of an array aggregate, all of the array's base kind.
    Array(Vec<Value>),
}

impl Value {
    /// The zero value of a scalar kind.
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int32 => Value::Int32(0),
            ScalarKind::Int64 => Value::Int64(0),
            ScalarKind::Float64 => Value::Float64(0.0),
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::DateTime => Value::DateTime(zero_datetime()),
            ScalarKind::Bytes => Value::Bytes(Vec::new()),
        }
    }

    /// Whether this is the zero value of its kind. `Null` counts as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Int32(v) => *v == 0,
            Value::Int64(v) => *v == 0,
            Value::Float64(v) => *v == 0.0,
            Value::Bool(v) => !*v,
            Value::String(v) => v.is_empty(),
            Value::DateTime(v) => *v == zero_datetime(),
            Value::Bytes(v) => v.is_empty(),
            Value::Array(v) => v.is_empty(),
        }
    }

    /// JSON form used inside array aggregates.
    ///
    /// Date-times are RFC 3339 strings and bytes are base64 strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Int32(v) => Json::from(*v),
            Value::Int64(v) => Json::from(*v),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Bool(v) => Json::Bool(*v),
            Value::String(v) => Json::String(v.clone()),
            Value::DateTime(v) => Json::String(format_datetime(v)),
            Value::Bytes(v) => Json::String(base64::engine::general_purpose::STANDARD.encode(v)),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }

    /// Storage representation handed to the database.
    pub fn to_sql_value(&self) -> SqlValue {
        match self {
            Value::Null => SqlValue::Null,
            Value::Int32(v) => SqlValue::Integer(i64::from(*v)),
            Value::Int64(v) => SqlValue::Integer(*v),
            Value::Float64(v) => SqlValue::Real(*v),
            Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
            Value::String(v) => SqlValue::Text(v.clone()),
            Value::DateTime(v) => SqlValue::Text(format_datetime(v)),
            Value::Bytes(v) => SqlValue::Blob(v.clone()),
            Value::Array(_) => SqlValue::Text(self.to_json().to_string()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(self.to_sql_value()))
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
