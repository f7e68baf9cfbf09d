//! Text renderings of JSON values and parsing of user-entered JSON text.

use serde_json::Value;

use crate::types::EditError;

/// Two-space indented JSON, the form copied out of a tree view.
pub fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Compact single-line JSON, as shown next to field names.
pub fn to_compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Parses user-entered JSON text. Surrounding whitespace is allowed.
pub fn parse_value(text: &str) -> Result<Value, EditError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pretty_uses_two_space_indent() {
        assert_eq!(to_pretty(&json!({"a": [1]})), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn compact_keeps_key_order() {
        assert_eq!(to_compact(&json!({"z": 1, "a": "x"})), r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn parse_value_matrix() {
        assert_eq!(parse_value(" 12 ").unwrap(), json!(12));
        assert_eq!(parse_value("\"s\"").unwrap(), json!("s"));
        assert_eq!(parse_value("[1,{\"a\":null}]").unwrap(), json!([1, {"a": null}]));
        assert!(matches!(parse_value("{"), Err(EditError::Parse(_))));
        assert!(matches!(parse_value("abc"), Err(EditError::Parse(_))));
        assert!(matches!(parse_value(""), Err(EditError::Parse(_))));
    }
}
