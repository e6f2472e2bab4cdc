//! Per-column value parsers.

use crate::schema::{ColumnType, ScalarKind};

use super::datetime::parse_datetime;
use super::{Value, ValueParseError, ValueResult};

/// Parser for one column, selected from its type when the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueParser {
    Scalar(ScalarKind),
    /// Comma-separated cell of the given element kind.
    Array(ScalarKind),
}

impl ValueParser {
    pub fn for_type(ty: &ColumnType) -> Self {
        match ty {
            ColumnType::Scalar(kind) => ValueParser::Scalar(*kind),
            ColumnType::Array(base) => ValueParser::Array(base.scalar_kind()),
        }
    }

    /// Parse a raw cell. Blank cells yield the zero value.
    pub fn parse(&self, raw: &str) -> ValueResult<Value> {
        match self {
            ValueParser::Scalar(kind) => parse_scalar(*kind, raw),
            ValueParser::Array(kind) => parse_array(*kind, raw),
        }
    }
}

/// Parse one scalar cell.
pub fn parse_scalar(kind: ScalarKind, raw: &str) -> ValueResult<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::zero(kind));
    }

    let invalid = |reason: String| ValueParseError::Invalid {
        kind,
        value: raw.to_string(),
        reason,
    };

    match kind {
        ScalarKind::Int32 => raw
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|e| invalid(e.to_string())),
        ScalarKind::Int64 => raw
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| invalid(e.to_string())),
        ScalarKind::Float64 => raw
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| invalid(e.to_string())),
        ScalarKind::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| invalid("expected a boolean".to_string())),
        ScalarKind::String => Ok(Value::String(raw.to_string())),
        ScalarKind::DateTime => parse_datetime(raw)
            .map(Value::DateTime)
            .ok_or_else(|| invalid("no matching date/time format".to_string())),
        ScalarKind::Bytes => Ok(Value::Bytes(raw.as_bytes().to_vec())),
    }
}

/// Parse a comma-separated array cell, dropping zero-valued elements.
///
/// An element that fails to parse fails the whole cell.
pub fn parse_array(kind: ScalarKind, raw: &str) -> ValueResult<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    let mut items = Vec::new();
    for part in raw.split(',') {
        let value = parse_scalar(kind, part)?;
        if !value.is_zero() {
            items.push(value);
        }
    }
    Ok(Value::Array(items))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_column_type;

    #[test]
    fn test_blank_is_zero() {
        assert_eq!(parse_scalar(ScalarKind::Int32, "  "), Ok(Value::Int32(0)));
        assert_eq!(parse_scalar(ScalarKind::Bool, ""), Ok(Value::Bool(false)));
        assert_eq!(
            parse_scalar(ScalarKind::String, ""),
            Ok(Value::String(String::new()))
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse_scalar(ScalarKind::Int32, " 42 "), Ok(Value::Int32(42)));
        assert_eq!(
            parse_scalar(ScalarKind::Int64, "9000000000"),
            Ok(Value::Int64(9_000_000_000))
        );
        assert!(parse_scalar(ScalarKind::Int32, "9000000000").is_err());
        assert!(parse_scalar(ScalarKind::Int32, "1.5").is_err());
    }

    #[test]
    fn test_float_and_bool() {
        assert_eq!(parse_scalar(ScalarKind::Float64, "2.5"), Ok(Value::Float64(2.5)));
        assert_eq!(parse_scalar(ScalarKind::Bool, "TRUE"), Ok(Value::Bool(true)));
        assert_eq!(parse_scalar(ScalarKind::Bool, "0"), Ok(Value::Bool(false)));
        assert!(parse_scalar(ScalarKind::Bool, "yes").is_err());
    }

    #[test]
    fn test_datetime_error_carries_value() {
        let err = parse_scalar(ScalarKind::DateTime, "not-a-date").unwrap_err();
        assert!(matches!(
            err,
            ValueParseError::Invalid { kind: ScalarKind::DateTime, ref value, .. } if value == "not-a-date"
        ));
        assert!(parse_scalar(ScalarKind::DateTime, "2024-01-02 15:04:05").is_ok());
    }

    #[test]
    fn test_array_drops_zeros() {
        let parser = ValueParser::for_type(&parse_column_type("array<int>"));
        assert_eq!(
            parser.parse("1, 0, ,3"),
            Ok(Value::Array(vec![Value::Int32(1), Value::Int32(3)]))
        );
        assert_eq!(parser.parse(""), Ok(Value::Array(Vec::new())));
        assert!(parser.parse("1,x").is_err());
    }

    #[test]
    fn test_parser_selection() {
        assert_eq!(
            ValueParser::for_type(&parse_column_type("bigint")),
            ValueParser::Scalar(ScalarKind::Int64)
        );
        assert_eq!(
            ValueParser::for_type(&parse_column_type("array<bool>")),
            ValueParser::Array(ScalarKind::Bool)
        );
    }
}
