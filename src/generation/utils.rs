//! String transformation utilities for Go code generation
//!
//! These utilities belong in the generation domain as they are used
//! for turning model names and literal data into Go source text.

/// Converts a schema-level name into an exported Go identifier.
///
/// Go exports an identifier when its first character is upper case. The rest of
/// the name is kept as-is so acronyms such as `SSECustomerKey` survive.
///
/// # Examples
/// ```
/// use smokegen::generation::utils::to_exported_name;
///
/// assert_eq!(to_exported_name("bucket"), "Bucket");
/// assert_eq!(to_exported_name("SSECustomerKey"), "SSECustomerKey");
/// assert_eq!(to_exported_name("max-items"), "MaxItems");
/// ```
pub fn to_exported_name(s: &str) -> String {
    s.split(|c: char| c == '-' || c == '_' || c == ' ' || c == '.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Quotes a string as an interpreted Go string literal.
///
/// Backslashes, quotes and control characters are escaped; everything else,
/// including non-ASCII text, is emitted verbatim since Go sources are UTF-8.
///
/// # Examples
/// ```
/// use smokegen::generation::utils::go_string_literal;
///
/// assert_eq!(go_string_literal("a\"b"), r#""a\"b""#);
/// assert_eq!(go_string_literal("line\n"), r#""line\n""#);
/// ```
pub fn go_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Name of a JSON value's type, used in diagnostics
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Tab indentation for the given nesting depth
pub fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_exported_name() {
        assert_eq!(to_exported_name("GetObject"), "GetObject");
        assert_eq!(to_exported_name("getObject"), "GetObject");
        assert_eq!(to_exported_name("next_token"), "NextToken");
        assert_eq!(to_exported_name("SSECustomerKey"), "SSECustomerKey");
        assert_eq!(to_exported_name(""), "");
    }

    #[test]
    fn test_go_string_literal() {
        assert_eq!(go_string_literal("plain"), "\"plain\"");
        assert_eq!(go_string_literal("C:\\path"), "\"C:\\\\path\"");
        assert_eq!(go_string_literal("tab\there"), "\"tab\\there\"");
        assert_eq!(go_string_literal("\u{1}"), "\"\\x01\"");
        assert_eq!(go_string_literal("héllo"), "\"héllo\"");
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&serde_json::json!(null)), "null");
        assert_eq!(json_kind(&serde_json::json!([1])), "array");
        assert_eq!(json_kind(&serde_json::json!({"a": 1})), "object");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "\t\t");
    }
}
