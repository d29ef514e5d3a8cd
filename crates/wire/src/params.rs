// SPDX-License-Identifier: MIT

//! Typed parameter parsing (spec §6.2): input parameters arrive as JSON
//! grouped by type bucket, e.g. `{"INTEGER": {"userId": 123}, "STRING":
//! {"username": "johndoe"}}`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::WireError;

/// A single parsed parameter value, tagged with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Float(f64),
}

const KNOWN_BUCKETS: [&str; 4] = ["INTEGER", "STRING", "BOOLEAN", "FLOAT"];

/// Parse a type-bucketed JSON object into a flat, name-keyed parameter
/// map. `{}` parses to an empty map with no error; an unrecognized
/// top-level bucket name fails the whole parse.
pub fn parse_typed_parameters(input: &Value) -> Result<IndexMap<String, ParamValue>, WireError> {
    let mut out = IndexMap::new();
    let Some(buckets) = input.as_object() else {
        return Ok(out);
    };

    for (bucket, values) in buckets {
        if !KNOWN_BUCKETS.contains(&bucket.as_str()) {
            return Err(WireError::UnknownParameterType(bucket.clone()));
        }
        let Some(values) = values.as_object() else {
            continue;
        };
        for (name, value) in values {
            let parsed = match bucket.as_str() {
                "INTEGER" => ParamValue::Integer(value.as_i64().unwrap_or_default()),
                "STRING" => ParamValue::Text(value.as_str().unwrap_or_default().to_string()),
                "BOOLEAN" => ParamValue::Boolean(value.as_bool().unwrap_or_default()),
                "FLOAT" => ParamValue::Float(value.as_f64().unwrap_or_default()),
                _ => unreachable!("bucket already validated against KNOWN_BUCKETS"),
            };
            out.insert(name.clone(), parsed);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_parses_to_empty_map() {
        let parsed = parse_typed_parameters(&json!({})).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn parses_every_known_bucket() {
        let parsed = parse_typed_parameters(&json!({
            "INTEGER": {"userId": 123},
            "STRING": {"username": "johndoe"},
            "BOOLEAN": {"active": true},
            "FLOAT": {"score": 1.5},
        }))
        .unwrap();
        assert_eq!(parsed.get("userId"), Some(&ParamValue::Integer(123)));
        assert_eq!(
            parsed.get("username"),
            Some(&ParamValue::Text("johndoe".to_string()))
        );
        assert_eq!(parsed.get("active"), Some(&ParamValue::Boolean(true)));
        assert_eq!(parsed.get("score"), Some(&ParamValue::Float(1.5)));
    }

    #[test]
    fn unknown_bucket_is_rejected() {
        let err = parse_typed_parameters(&json!({"DATE": {"createdAt": "2026-01-01"}}))
            .unwrap_err();
        assert_eq!(err, WireError::UnknownParameterType("DATE".to_string()));
    }

    proptest::proptest! {
        #[test]
        fn round_trips_through_serialize(n in -1_000_000i64..1_000_000) {
            let input = json!({"INTEGER": {"x": n}});
            let parsed = parse_typed_parameters(&input).unwrap();
            prop_assert_eq!(parsed.get("x"), Some(&ParamValue::Integer(n)));
        }
    }
}
