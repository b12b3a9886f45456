//! Fuzz target for structured filter parameters.
//!
//! Generates nested parameter maps the way JSON request bodies arrive and
//! checks that compiling them never panics, in either mode.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_filter_params
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quarry_query::{FilterCompiler, QueryParams};
use serde_json::Value;

/// A fuzzable parameter value.
#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FuzzValue>),
    Object(Vec<(FuzzKey, FuzzValue)>),
}

/// Keys biased towards operator suffixes.
#[derive(Debug, Arbitrary)]
enum FuzzKey {
    Raw(String),
    Field(String),
    WithOperator(String, u8),
}

const OPERATORS: &[&str] = &[
    "in", "notIn", "or", "icontains", "contains", "isNull", "isEmpty", "gt", "gte", "lt",
    "lte", "startsWith", "endsWith", "hasSome", "some", "every",
];

impl FuzzKey {
    fn render(&self) -> String {
        match self {
            FuzzKey::Raw(s) => s.clone(),
            FuzzKey::Field(s) => s.chars().filter(|c| c.is_alphanumeric()).collect(),
            FuzzKey::WithOperator(s, op) => {
                format!("{}__{}", s, OPERATORS[*op as usize % OPERATORS.len()])
            }
        }
    }
}

impl FuzzValue {
    fn to_json(&self, depth: usize) -> Value {
        // Limit recursion depth to prevent stack overflow
        if depth > 8 {
            return Value::Null;
        }

        match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(*b),
            FuzzValue::Int(i) => Value::from(*i),
            FuzzValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FuzzValue::String(s) => Value::String(s.clone()),
            FuzzValue::List(items) => {
                Value::Array(items.iter().map(|v| v.to_json(depth + 1)).collect())
            }
            FuzzValue::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.render(), v.to_json(depth + 1)))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    strict: bool,
    entries: Vec<(FuzzKey, FuzzValue)>,
}

fuzz_target!(|input: FuzzInput| {
    let params: QueryParams = input
        .entries
        .iter()
        .map(|(k, v)| (k.render(), v.to_json(0)))
        .collect();

    let compiler = FilterCompiler::new().strict(input.strict);
    let lenient = compiler.compile(&params);
    let _ = serde_json::to_string(&lenient);

    if compiler.try_compile(&params).is_ok() {
        assert_eq!(compiler.compile(&params), lenient);
    }
});
