//! Array aggregate encoding and element-slot reconstruction.
//!
//! An array field with `N` element slots is stored twice: once as a JSON array
//! in its aggregate column and once spread over `Name_0..Name_(N-1)`. Reading
//! back walks the slots in index order and stops at the first zero slot.

use base64::Engine as _;

use crate::schema::ScalarKind;

use super::datetime::parse_datetime;
use super::{Value, ValueParseError, ValueResult};

/// JSON text stored in an aggregate column.
pub fn encode_array(values: &[Value]) -> String {
    serde_json::Value::Array(values.iter().map(Value::to_json).collect()).to_string()
}

/// Decode an aggregate column back into element values of `kind`.
pub fn decode_array(json: &str, kind: ScalarKind) -> ValueResult<Vec<Value>> {
    let encoding_error = |reason: String| ValueParseError::ArrayEncoding {
        value: json.to_string(),
        reason,
    };

    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| encoding_error(e.to_string()))?;
    let serde_json::Value::Array(items) = parsed else {
        return Err(encoding_error("not a JSON array".to_string()));
    };

    items
        .iter()
        .map(|item| {
            element_from_json(kind, item)
                .ok_or_else(|| encoding_error(format!("element {} is not a {}", item, kind)))
        })
        .collect()
}

fn element_from_json(kind: ScalarKind, item: &serde_json::Value) -> Option<Value> {
    let value = match kind {
        ScalarKind::Int32 => Value::Int32(i32::try_from(item.as_i64()?).ok()?),
        ScalarKind::Int64 => Value::Int64(item.as_i64()?),
        ScalarKind::Float64 => Value::Float64(item.as_f64()?),
        ScalarKind::Bool => Value::Bool(item.as_bool()?),
        ScalarKind::String => Value::String(item.as_str()?.to_string()),
        ScalarKind::DateTime => Value::DateTime(parse_datetime(item.as_str()?)?),
        ScalarKind::Bytes => Value::Bytes(
            base64::engine::general_purpose::STANDARD
                .decode(item.as_str()?)
                .ok()?,
        ),
    };
    Some(value)
}

/// Spread element values over `len` slots; missing slots are `Null`.
///
/// Values beyond `len` have no slot and are not represented.
pub fn expand_slots(values: &[Value], len: usize) -> Vec<Value> {
    (0..len)
        .map(|i| values.get(i).cloned().unwrap_or(Value::Null))
        .collect()
}

/// Read slots back in index order, stopping at the first zero or `Null`.
pub fn reconstruct(slots: &[Value]) -> Vec<Value> {
    slots
        .iter()
        .take_while(|v| !v.is_zero())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_slots() {
        let values = vec![
            Value::String("fire".into()),
            Value::String("ice".into()),
            Value::String("wind".into()),
        ];
        let json = encode_array(&values);
        assert_eq!(json, r#"["fire","ice","wind"]"#);

        let decoded = decode_array(&json, ScalarKind::String).unwrap();
        let slots = expand_slots(&decoded, 3);
        assert_eq!(reconstruct(&slots), values);
    }

    #[test]
    fn test_gap_truncates() {
        let slots = vec![Value::Int32(4), Value::Int32(0), Value::Int32(6)];
        assert_eq!(reconstruct(&slots), vec![Value::Int32(4)]);

        let slots = expand_slots(&[Value::Int64(1)], 3);
        assert_eq!(slots[1], Value::Null);
        assert_eq!(reconstruct(&slots), vec![Value::Int64(1)]);
    }

    #[test]
    fn test_decode_kinds() {
        assert_eq!(
            decode_array("[1.5, 2]", ScalarKind::Float64).unwrap(),
            vec![Value::Float64(1.5), Value::Float64(2.0)]
        );
        assert_eq!(
            decode_array(r#"["aGk="]"#, ScalarKind::Bytes).unwrap(),
            vec![Value::Bytes(b"hi".to_vec())]
        );
        let dates = decode_array(r#"["2024-01-02T15:04:05Z"]"#, ScalarKind::DateTime).unwrap();
        assert_eq!(dates.len(), 1);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(decode_array("{}", ScalarKind::Int32).is_err());
        assert!(decode_array("[", ScalarKind::Int32).is_err());
        assert!(decode_array(r#"["x"]"#, ScalarKind::Int32).is_err());
        assert!(decode_array("[3000000000]", ScalarKind::Int32).is_err());
    }
}
