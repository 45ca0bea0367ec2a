use serde_json::Value;

pub const CONTENT_TYPE: &str = "application/json";

pub fn is_json_content(content: &str) -> bool {
    let trimmed = content.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

/// Parses a response body as JSON, keeping it as a plain string otherwise.
pub fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Text form used when a value is spliced into a larger string.
pub fn to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_json_content() {
        assert!(is_json_content(r#"  {"key": "value"}  "#));
        assert!(is_json_content("[]"));
        assert!(!is_json_content("plain text"));
        assert!(!is_json_content("{not closed"));
    }

    #[test]
    fn test_parse_body_json_and_text() {
        assert_eq!(parse_body(r#"{"id": 1}"#), json!({"id": 1}));
        assert_eq!(parse_body("hello"), json!("hello"));
        assert_eq!(parse_body(""), json!(""));
    }

    #[test]
    fn test_to_plain_string() {
        assert_eq!(to_plain_string(&json!("abc")), "abc");
        assert_eq!(to_plain_string(&json!(42)), "42");
        assert_eq!(to_plain_string(&json!({"a": true})), r#"{"a":true}"#);
    }
}
