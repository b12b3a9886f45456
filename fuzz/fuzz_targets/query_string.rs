//! Fuzz target for query-string compilation.
//!
//! Feeds arbitrary strings through decoding, tokenizing and merging.
//! Compilation in lenient mode must never panic and never emit an unsafe key.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_query_string
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry_query::{FieldClassification, FilterCompiler, FilterKey};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for key in input.split('&').filter_map(|pair| pair.split('=').next()) {
        let parsed = FilterKey::parse(key);
        let plain = parsed
            .fields
            .iter()
            .all(|f| !f.is_empty() && f.chars().all(char::is_alphanumeric));
        if plain {
            assert_eq!(FilterKey::parse(&parsed.to_key()), parsed);
        }
    }

    let classification = FieldClassification::builder()
        .dates(["createdAt"])
        .booleans(["active"])
        .numerics(["age", "id"])
        .build();
    let compiler = FilterCompiler::new().with_classification(classification);

    let json = compiler.compile_query_string(input).to_json();
    assert!(!contains_unsafe_key(&json));
});

fn contains_unsafe_key(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Object(map) => map.iter().any(|(k, v)| {
            matches!(k.as_str(), "__proto__" | "constructor" | "prototype") || contains_unsafe_key(v)
        }),
        serde_json::Value::Array(items) => items.iter().any(contains_unsafe_key),
        _ => false,
    }
}
