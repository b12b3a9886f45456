//! Fuzz target for the schema parser.
//!
//! Parsing is tolerant, so arbitrary input must produce a document and
//! never panic. Every surviving model is re-checked for basic consistency.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_schema_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry_schema::parse_schema;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let doc = parse_schema(input);

        for model in &doc.models {
            assert!(!model.name.is_empty());
            for field in &model.fields {
                assert!(!field.name.is_empty());
                if field.connection_field.is_some() {
                    assert!(field.is_relation);
                }
            }
        }
        for schema_enum in &doc.enums {
            assert!(schema_enum.values.iter().all(|v| !v.starts_with('@')));
        }
    }
});
