//! Flattening request payloads into form fields.
//!
//! Telegraph takes one form field per parameter. A payload is first
//! serialized to JSON, then each top-level property becomes a string: strings
//! as they are, numbers and booleans as their JSON text, arrays and objects
//! (encoded content, field lists) as compact JSON. Null properties are left
//! out.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TelegraphError};

/// Bytes left as is in `application/x-www-form-urlencoded` values.
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Bytes left as is in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Serialize `payload` and flatten it into ordered `(name, value)` pairs.
pub fn to_form_fields<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<(String, String)>> {
    let value =
        serde_json::to_value(payload).map_err(|e| TelegraphError::Serialization(e.to_string()))?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(object) => object
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| flatten_value(v).map(|v| (k, v)))
            .collect(),
        _ => Err(TelegraphError::Serialization(
            "request payload must serialize to an object".to_string(),
        )),
    }
}

fn flatten_value(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        complex => serde_json::to_string(&complex)
            .map_err(|e| TelegraphError::Serialization(e.to_string())),
    }
}

/// Encode fields as an `application/x-www-form-urlencoded` body.
pub fn encode(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, FORM_VALUE),
                utf8_percent_encode(v, FORM_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode `segment` for use as one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_become_strings_and_nulls_are_dropped() {
        let fields = to_form_fields(&json!({
            "title": "Sample Page",
            "return_content": false,
            "limit": 40,
            "author_name": null
        }))
        .unwrap();
        assert_eq!(
            fields,
            vec![
                ("title".to_string(), "Sample Page".to_string()),
                ("return_content".to_string(), "false".to_string()),
                ("limit".to_string(), "40".to_string()),
            ]
        );
    }

    #[test]
    fn arrays_and_objects_become_json_text() {
        let fields = to_form_fields(&json!({
            "fields": ["short_name", "page_count"],
            "content": [{"tag": "p", "children": ["Hi"]}]
        }))
        .unwrap();
        assert_eq!(fields[0].1, r#"["short_name","page_count"]"#);
        assert_eq!(fields[1].1, r#"[{"tag":"p","children":["Hi"]}]"#);
    }

    #[test]
    fn unit_payload_has_no_fields() {
        assert!(to_form_fields(&()).unwrap().is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(
            to_form_fields(&json!([1, 2])),
            Err(TelegraphError::Serialization(_))
        ));
    }

    #[test]
    fn encode_escapes_reserved_bytes() {
        let body = encode(&[
            ("title".to_string(), "Sample Page & more".to_string()),
            ("fields".to_string(), r#"["short_name"]"#.to_string()),
        ]);
        assert_eq!(
            body,
            "title=Sample%20Page%20%26%20more&fields=%5B%22short_name%22%5D"
        );
    }

    #[test]
    fn path_segment_keeps_slug_characters() {
        assert_eq!(
            encode_path_segment("Sample-Page-12-15"),
            "Sample-Page-12-15"
        );
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
    }
}
