//! Top-level block extraction.
//!
//! Finds every `model Name { ... }` and `enum Name { ... }` block in a body of
//! schema text. Braces are balanced across the whole block, skipping string
//! literals and `//` comments, so nested braces never end a block early.
//! Blocks of other kinds (`datasource`, `generator`, ...) are stepped over.

use tracing::debug;

use crate::ast::{BlockKind, Span};

/// A block found by [`extract_blocks`], borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Block keyword.
    pub kind: BlockKind,
    /// Declared name.
    pub name: &'a str,
    /// Whole block, from the keyword to the closing brace inclusive.
    pub text: &'a str,
    /// Text between the braces.
    pub body: &'a str,
    /// Location of `text` in the source.
    pub span: Span,
    /// Byte offset of `body` in the source.
    pub body_offset: usize,
}

/// Model and enum blocks in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedBlocks<'a> {
    /// `model` blocks.
    pub models: Vec<RawBlock<'a>>,
    /// `enum` blocks.
    pub enums: Vec<RawBlock<'a>>,
}

impl ExtractedBlocks<'_> {
    /// Total number of blocks.
    pub fn len(&self) -> usize {
        self.models.len() + self.enums.len()
    }

    /// Check if no block was found.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.enums.is_empty()
    }
}

/// Scan schema text for model and enum blocks.
///
/// Declarations without a name, without an opening brace, or without a
/// matching closing brace are dropped silently.
pub fn extract_blocks(source: &str) -> ExtractedBlocks<'_> {
    let bytes = source.as_bytes();
    let mut blocks = ExtractedBlocks::default();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line_comment(bytes, i),
            b'"' => i = skip_string(bytes, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            c if depth == 0 && is_ident_start(c) && !preceded_by_ident(bytes, i) => {
                let word_end = scan_ident(bytes, i);
                let word = &source[i..word_end];

                if let Some(kind) = BlockKind::from_keyword(word) {
                    match read_block(source, i, word_end, kind) {
                        Some(block) => {
                            i = block.span.end;
                            match kind {
                                BlockKind::Model => blocks.models.push(block),
                                BlockKind::Enum => blocks.enums.push(block),
                            }
                            continue;
                        }
                        None => {
                            debug!(keyword = word, offset = i, "dropping malformed block declaration");
                        }
                    }
                }
                i = word_end;
            }
            _ => i += 1,
        }
    }

    blocks
}

/// Read `<keyword> <Name> { ... }` starting at `start`.
fn read_block<'a>(
    source: &'a str,
    start: usize,
    keyword_end: usize,
    kind: BlockKind,
) -> Option<RawBlock<'a>> {
    let bytes = source.as_bytes();

    let name_start = skip_whitespace(bytes, keyword_end);
    if name_start == keyword_end || name_start >= bytes.len() || !is_ident_start(bytes[name_start]) {
        return None;
    }
    let name_end = scan_ident(bytes, name_start);

    let open = skip_whitespace(bytes, name_end);
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let close = find_closing_brace(bytes, open)?;

    Some(RawBlock {
        kind,
        name: &source[name_start..name_end],
        text: &source[start..=close],
        body: &source[open + 1..close],
        span: Span::new(start, close + 1),
        body_offset: open + 1,
    })
}

/// Find the brace matching the one at `open`, tracking depth.
fn find_closing_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line_comment(bytes, i);
                continue;
            }
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Skip a double-quoted string starting at `i`; returns the index after it.
pub(crate) fn skip_string(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j + 1,
            b'\n' => return j,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Skip a `//` comment starting at `i`; returns the index of the newline.
pub(crate) fn skip_line_comment(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| i + p)
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn scan_ident(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_ident_char(bytes[i]) {
        i += 1;
    }
    i
}

fn preceded_by_ident(bytes: &[u8], i: usize) -> bool {
    i > 0 && is_ident_char(bytes[i - 1])
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(crate) fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
