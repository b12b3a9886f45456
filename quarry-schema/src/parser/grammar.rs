//! Pest grammar for attribute tokens.

use pest_derive::Parser;

/// Parser for a single `@name(args)` token.
#[derive(Parser)]
#[grammar = "parser/attribute.pest"]
pub struct AttributeParser;
