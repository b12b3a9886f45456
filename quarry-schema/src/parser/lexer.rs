//! Tokenizer for block bodies.
//!
//! Splits a body into words at top-level whitespace. Parentheses, brackets and
//! string literals are kept inside a single word, so an attribute such as
//! `@relation(fields: [authorId], references: [id])` is one token even though
//! it contains spaces. Line breaks are reported as tokens because a field
//! declaration ends at the end of its line; `//` comments are dropped.

use crate::ast::Span;

use super::extract::{skip_line_comment, skip_string};

/// Token kinds produced by [`tokenize_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A run of non-whitespace text.
    Word,
    /// A line break outside of any parentheses.
    Newline,
}

/// A token borrowed from the body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Location relative to the start of the body.
    pub span: Span,
}

impl Token<'_> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Split a block body into words and line breaks.
pub(crate) fn tokenize_body(body: &str) -> Vec<Token<'_>> {
    let bytes = body.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                tokens.push(Token {
                    kind: TokenKind::Newline,
                    text: &body[i..i + 1],
                    span: Span::new(i, i + 1),
                });
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line_comment(bytes, i),
            _ => {
                let end = scan_word(bytes, i);
                tokens.push(Token {
                    kind: TokenKind::Word,
                    text: &body[i..end],
                    span: Span::new(i, end),
                });
                i = end;
            }
        }
    }

    tokens
}

/// Scan one word starting at `start`, keeping nested groups together.
fn scan_word(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'/' if depth == 0 && bytes.get(i + 1) == Some(&b'/') => break,
            b if depth == 0 && b.is_ascii_whitespace() => break,
            _ => {}
        }
        i += 1;
    }

    i
}
