//! Decoding raw query parameters.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::{QueryError, QueryResult};

/// An insertion-ordered parameter map.
pub type QueryParams = Map<String, Value>;

/// Decode `application/x-www-form-urlencoded` text.
///
/// A leading `?` is ignored. A key given more than once collects its
/// values into an array, in order.
///
/// ```rust
/// use quarry_query::params::parse_query_string;
///
/// let params = parse_query_string("?age__gt=25&tags=a&tags=b");
/// assert_eq!(params["age__gt"], "25");
/// assert_eq!(params["tags"], serde_json::json!(["a", "b"]));
/// ```
pub fn parse_query_string(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = QueryParams::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match params.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(key.into_owned(), value);
            }
        }
    }
    params
}

/// Decode a JSON object of parameters.
pub fn params_from_json(json: &str) -> QueryResult<QueryParams> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(QueryError::deserialization(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_percent_decoding() {
        let params = parse_query_string("name__icontains=j%C3%B8&city=New+York");
        assert_eq!(Value::Object(params), json!({"name__icontains": "jø", "city": "New York"}));
    }

    #[test]
    fn test_bracket_keys_are_decoded() {
        let params = parse_query_string("author%5Bname%5D=x");
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["author[name]"]);
    }

    #[test]
    fn test_repeated_keys() {
        let params = parse_query_string("id=1&id=2&id=3");
        assert_eq!(params["id"], json!(["1", "2", "3"]));
    }

    #[test]
    fn test_order_is_preserved() {
        let params = parse_query_string("b=1&a=2&c=3");
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query_string("").is_empty());
        assert!(parse_query_string("?").is_empty());
    }

    #[test]
    fn test_params_from_json() {
        let params = params_from_json(r#"{"age__gt": 25, "author": {"name": "x"}}"#).unwrap();
        assert_eq!(params["age__gt"], json!(25));

        let err = params_from_json("[1, 2]").unwrap_err();
        assert_eq!(err.code, ErrorCode::DeserializationError);
        assert!(err.message.contains("an array"));

        let err = params_from_json("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::DeserializationError);
    }
}
