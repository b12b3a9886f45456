//! Attribute token parsing.

use pest::Parser;
use pest::iterators::Pair;
use smol_str::SmolStr;

use crate::ast::{Attribute, AttributeArg, AttributeValue};

use super::grammar::{AttributeParser, Rule};

/// Parse one `@name(args)` token. Returns `None` if the token is malformed.
///
/// Block directives are accepted too: `@@map("users")` parses as `map`.
pub fn parse_attribute(token: &str) -> Option<Attribute> {
    let token = token.strip_prefix('@').filter(|t| t.starts_with('@')).unwrap_or(token);
    let root = AttributeParser::parse(Rule::field_attribute, token).ok()?.next()?;

    let mut inner = root.into_inner();
    let name = inner.next()?.as_str();

    let mut args = vec![];
    for item in inner {
        if item.as_rule() == Rule::attribute_args {
            args = item.into_inner().map(parse_attribute_arg).collect();
        }
    }

    Some(Attribute::new(name, args))
}

/// Raw text of the first top-level argument inside the token's parentheses.
///
/// `@default("a", map: "x")` yields `"a"`; `@id` yields `None`.
pub fn first_argument_text(token: &str) -> Option<&str> {
    let open = token.find('(')?;
    let close = token.rfind(')')?;
    if close <= open {
        return None;
    }
    let inner = &token[open + 1..close];

    let bytes = inner.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'(' | b'[' if !in_string => depth += 1,
            b')' | b']' if !in_string => depth = depth.saturating_sub(1),
            b',' if !in_string && depth == 0 => return Some(inner[..i].trim()),
            _ => {}
        }
        i += 1;
    }

    Some(inner.trim())
}

/// Name of the attribute a raw token starts with, without parsing arguments.
pub fn attribute_name(token: &str) -> &str {
    let name = token.trim_start_matches('@');
    let end = name
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(name.len());
    &name[..end]
}

/// First identifier listed in a `@relation(fields: [...])` argument.
pub fn relation_connection_field(attr: &Attribute) -> Option<SmolStr> {
    let first = attr.get_arg("fields")?.as_array()?.first()?;
    let name = first.as_name()?.trim_matches('"').trim_matches('\'');
    (!name.is_empty()).then(|| SmolStr::new(name))
}

fn parse_attribute_arg(pair: Pair<'_, Rule>) -> AttributeArg {
    let Some(inner) = pair.clone().into_inner().next() else {
        return AttributeArg::positional(AttributeValue::Ident(SmolStr::new(pair.as_str())));
    };

    if inner.as_rule() == Rule::named_arg {
        let mut parts = inner.into_inner();
        match (parts.next(), parts.next()) {
            (Some(name), Some(value)) => AttributeArg::named(name.as_str(), parse_attribute_value(value)),
            _ => AttributeArg::positional(AttributeValue::Ident(SmolStr::new(pair.as_str()))),
        }
    } else {
        AttributeArg::positional(parse_attribute_value(inner))
    }
}

fn parse_attribute_value(pair: Pair<'_, Rule>) -> AttributeValue {
    match pair.as_rule() {
        Rule::attribute_value => match pair.clone().into_inner().next() {
            Some(inner) => parse_attribute_value(inner),
            None => AttributeValue::Ident(SmolStr::new(pair.as_str())),
        },
        Rule::string_literal => {
            let s = pair.as_str();
            AttributeValue::String(unescape(&s[1..s.len() - 1]))
        }
        Rule::number_literal => parse_number(pair.as_str()),
        Rule::boolean_literal => AttributeValue::Boolean(pair.as_str() == "true"),
        Rule::function_call => {
            let mut inner = pair.into_inner();
            let name = inner.next().map(|p| SmolStr::new(p.as_str())).unwrap_or_default();
            let args = inner.map(|arg| parse_attribute_arg(arg).value).collect();
            AttributeValue::Function(name, args)
        }
        Rule::array_literal => {
            AttributeValue::Array(pair.into_inner().map(parse_attribute_value).collect())
        }
        _ => AttributeValue::Ident(SmolStr::new(pair.as_str())),
    }
}

fn parse_number(s: &str) -> AttributeValue {
    if !s.contains('.') {
        if let Ok(i) = s.parse::<i64>() {
            return AttributeValue::Int(i);
        }
    }
    match s.parse::<f64>() {
        Ok(f) => AttributeValue::Float(f),
        Err(_) => AttributeValue::Ident(SmolStr::new(s)),
    }
}

pub(crate) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
