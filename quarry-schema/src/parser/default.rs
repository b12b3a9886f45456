//! Conversion of `@default(...)` arguments to literal values.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::ast::DefaultValue;

use super::attribute::{first_argument_text, unescape};

static INT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid regex"));
static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.\d+$").expect("valid regex"));
static IDENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Default value carried by a raw `@default(...)` token.
pub fn default_from_token(token: &str) -> Option<DefaultValue> {
    convert_default_literal(first_argument_text(token)?)
}

/// Convert the text of a default argument.
///
/// Function calls such as `autoincrement()` or `now()` are generated by the
/// database and yield `None`, as does anything that is not a plain literal.
pub fn convert_default_literal(text: &str) -> Option<DefaultValue> {
    let text = text.trim();

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Some(DefaultValue::String(unescape(&text[1..text.len() - 1])));
    }
    if text.contains('(') {
        return None;
    }

    match text {
        "true" => Some(DefaultValue::Boolean(true)),
        "false" => Some(DefaultValue::Boolean(false)),
        _ if INT_PATTERN.is_match(text) => match text.parse::<i64>() {
            Ok(i) => Some(DefaultValue::Int(i)),
            Err(_) => text.parse::<f64>().ok().map(DefaultValue::Float),
        },
        _ if FLOAT_PATTERN.is_match(text) => text.parse::<f64>().ok().map(DefaultValue::Float),
        _ if IDENT_PATTERN.is_match(text) => Some(DefaultValue::EnumLiteral(text.into())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_default() {
        assert_eq!(
            default_from_token(r#"@default("hello")"#),
            Some(DefaultValue::String("hello".into()))
        );
        assert_eq!(
            default_from_token(r#"@default("say \"hi\"")"#),
            Some(DefaultValue::String("say \"hi\"".into()))
        );
        assert_eq!(default_from_token(r#"@default("")"#), Some(DefaultValue::String(String::new())));
    }

    #[test]
    fn test_boolean_default() {
        assert_eq!(default_from_token("@default(true)"), Some(DefaultValue::Boolean(true)));
        assert_eq!(default_from_token("@default(false)"), Some(DefaultValue::Boolean(false)));
    }

    #[test]
    fn test_numeric_defaults() {
        assert_eq!(default_from_token("@default(42)"), Some(DefaultValue::Int(42)));
        assert_eq!(default_from_token("@default(-3)"), Some(DefaultValue::Int(-3)));
        assert_eq!(default_from_token("@default(3.14)"), Some(DefaultValue::Float(3.14)));
        assert_eq!(default_from_token("@default(-0.5)"), Some(DefaultValue::Float(-0.5)));
    }

    #[test]
    fn test_function_defaults_are_absent() {
        assert_eq!(default_from_token("@default(autoincrement())"), None);
        assert_eq!(default_from_token("@default(now())"), None);
        assert_eq!(default_from_token("@default(uuid())"), None);
        assert_eq!(default_from_token(r#"@default(dbgenerated("gen_random_uuid()"))"#), None);
    }

    #[test]
    fn test_enum_literal_default() {
        assert_eq!(
            default_from_token("@default(USER)"),
            Some(DefaultValue::EnumLiteral("USER".into()))
        );
    }

    #[test]
    fn test_first_argument_only() {
        assert_eq!(
            default_from_token(r#"@default("a", map: "DF_name")"#),
            Some(DefaultValue::String("a".into()))
        );
    }

    #[test]
    fn test_non_literal_defaults() {
        assert_eq!(default_from_token("@default([])"), None);
        assert_eq!(default_from_token("@default()"), None);
        assert_eq!(default_from_token("@default(1e5)"), None);
        assert_eq!(default_from_token("@default"), None);
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(
            convert_default_literal("99999999999999999999"),
            Some(DefaultValue::Float(99999999999999999999.0))
        );
    }
}
