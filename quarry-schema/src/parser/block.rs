//! Per-block parsing of model and enum bodies.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex_lite::Regex;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::ast::{EnumDescriptor, FieldDescriptor, FieldKind, ModelDescriptor, Span};

use super::attribute::{attribute_name, parse_attribute, relation_connection_field};
use super::default::default_from_token;
use super::extract::{RawBlock, is_ident_start};
use super::lexer::{Token, TokenKind, tokenize_body};

static RELATION_FIELDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"fields\s*:\s*\[\s*["']?([A-Za-z_][A-Za-z0-9_]*)"#).expect("valid regex")
});

/// Every model and enum name declared in a document.
///
/// Collected before any field is parsed so that relations to models declared
/// later in the text resolve the same way as relations to earlier ones.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    models: IndexSet<SmolStr>,
    enums: IndexSet<SmolStr>,
}

impl NameSet {
    /// Create an empty name set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a model name.
    pub fn add_model(&mut self, name: &str) {
        self.models.insert(SmolStr::new(name));
    }

    /// Record an enum name.
    pub fn add_enum(&mut self, name: &str) {
        self.enums.insert(SmolStr::new(name));
    }

    /// Check whether a model with this name is declared.
    pub fn is_model(&self, name: &str) -> bool {
        self.models.contains(name)
    }

    /// Check whether an enum with this name is declared.
    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }
}

/// Parse the body of a model block.
pub fn parse_model_block(block: &RawBlock<'_>, names: &NameSet) -> ModelDescriptor {
    let mut model = ModelDescriptor::new(block.name, block.span);

    for decl in group_declarations(&tokenize_body(block.body)) {
        match decl {
            Declaration::Directive(token) => {
                if attribute_name(token.text) == "map" && model.map_name.is_none() {
                    model.map_name = parse_attribute(token.text)
                        .and_then(|a| a.first_arg().and_then(|v| v.as_string()).map(String::from));
                }
            }
            Declaration::Field(tokens) => {
                if let Some(field) = parse_field(&tokens, block.body_offset, names) {
                    model.fields.push(field);
                }
            }
        }
    }

    model
}

/// Parse the body of an enum block.
pub fn parse_enum_block(block: &RawBlock<'_>) -> EnumDescriptor {
    let mut descriptor = EnumDescriptor::new(block.name, block.span);

    for token in tokenize_body(block.body) {
        if !token.is_word() || token.text.starts_with('@') {
            continue;
        }
        let value = token.text.trim_end_matches([',', ';']);
        if value.bytes().next().is_some_and(is_ident_start) {
            descriptor.values.push(SmolStr::new(value));
        } else if !value.is_empty() {
            trace!(enum_name = block.name, token = token.text, "skipping enum token");
        }
    }

    descriptor
}

enum Declaration<'a> {
    Field(Vec<Token<'a>>),
    Directive(Token<'a>),
}

/// Group body tokens into field declarations and `@@` directives.
///
/// A declaration ends at a line break. Several fields may also share a line:
/// once a declaration has its name and type, the next plain word starts a
/// new one.
fn group_declarations<'a>(tokens: &[Token<'a>]) -> Vec<Declaration<'a>> {
    let mut decls = Vec::new();
    let mut current: Vec<Token<'a>> = Vec::new();

    for token in tokens {
        if token.kind == TokenKind::Newline {
            flush(&mut decls, &mut current);
            continue;
        }

        let text = token.text;
        if text == "{" || text == "}" {
            continue;
        }
        if text.starts_with("@@") {
            flush(&mut decls, &mut current);
            decls.push(Declaration::Directive(*token));
            continue;
        }
        if current.len() >= 2 && text.bytes().next().is_some_and(is_ident_start) {
            flush(&mut decls, &mut current);
        }
        current.push(*token);
    }
    flush(&mut decls, &mut current);

    decls
}

fn flush<'a>(decls: &mut Vec<Declaration<'a>>, current: &mut Vec<Token<'a>>) {
    if !current.is_empty() {
        decls.push(Declaration::Field(std::mem::take(current)));
    }
}

fn parse_field(tokens: &[Token<'_>], body_offset: usize, names: &NameSet) -> Option<FieldDescriptor> {
    let (name_tok, type_tok) = match tokens {
        [name, ty, ..] if name.text.bytes().next().is_some_and(is_ident_start) => (name, ty),
        _ => {
            debug!(
                declaration = %tokens.iter().map(|t| t.text).collect::<Vec<_>>().join(" "),
                "dropping incomplete field declaration"
            );
            return None;
        }
    };

    let (type_name, mut is_array, mut is_optional) = strip_type_modifiers(type_tok.text);
    let mut field = FieldDescriptor::new(name_tok.text, type_name);

    for token in &tokens[2..] {
        let text = token.text;
        if text.starts_with('@') {
            field.attributes.push(text.to_string());
            match parse_attribute(text) {
                Some(attr) => field.parsed_attributes.push(attr),
                None => trace!(field = name_tok.text, token = text, "keeping unparsed attribute"),
            }
        } else {
            let (rest, array, optional) = strip_type_modifiers(text);
            if rest.is_empty() {
                is_array |= array;
                is_optional |= optional;
            } else {
                trace!(field = name_tok.text, token = text, "ignoring stray token");
            }
        }
    }

    // `?` anywhere in the declaration marks the field optional.
    is_optional |= tokens.iter().any(|t| t.text.contains('?'));

    field.is_array = is_array;
    field.is_optional = is_optional;
    field.is_id = field.attributes.iter().any(|a| a.starts_with("@id"));
    field.is_unique = field.attributes.iter().any(|a| attribute_name(a) == "unique");
    field.default_value = field
        .attributes
        .iter()
        .find(|a| attribute_name(a) == "default")
        .and_then(|a| default_from_token(a));

    field.kind = FieldKind::resolve(type_name, |t| names.is_model(t), |t| names.is_enum(t));
    field.is_relation = field.kind == FieldKind::Relation;

    if field.is_relation && !field.is_array {
        field.connection_field = connection_field(&field);
    }

    let first = tokens[0].span;
    let last = tokens[tokens.len() - 1].span;
    field.span = Span::new(first.start, last.end).offset(body_offset);

    Some(field)
}

/// Strip `?` and `[]` suffixes from a type token, in either order.
fn strip_type_modifiers(token: &str) -> (&str, bool, bool) {
    let mut ty = token;
    let mut is_array = false;
    let mut is_optional = false;

    if let Some(rest) = ty.strip_suffix('?') {
        is_optional = true;
        ty = rest;
    }
    if let Some(rest) = ty.strip_suffix("[]") {
        is_array = true;
        ty = rest;
    }
    if let Some(rest) = ty.strip_suffix('?') {
        is_optional = true;
        ty = rest;
    }

    (ty, is_array, is_optional)
}

fn connection_field(field: &FieldDescriptor) -> Option<SmolStr> {
    if let Some(attr) = field.get_attribute("relation") {
        return relation_connection_field(attr);
    }
    field
        .attributes
        .iter()
        .filter(|a| attribute_name(a) == "relation")
        .find_map(|a| RELATION_FIELDS.captures(a))
        .and_then(|c| c.get(1))
        .map(|m| SmolStr::new(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DefaultValue, ScalarType};
    use crate::parser::extract::extract_blocks;
    use pretty_assertions::assert_eq;

    fn names(models: &[&str], enums: &[&str]) -> NameSet {
        let mut set = NameSet::new();
        models.iter().for_each(|m| set.add_model(m));
        enums.iter().for_each(|e| set.add_enum(e));
        set
    }

    fn model(src: &str, known: &NameSet) -> ModelDescriptor {
        let blocks = extract_blocks(src);
        parse_model_block(&blocks.models[0], known)
    }

    #[test]
    fn test_single_line_model() {
        let m = model(
            "model User { id Int @id @default(autoincrement()) email String @unique name String? }",
            &names(&["User"], &[]),
        );

        let field_names: Vec<_> = m.fields.iter().map(|f| f.name()).collect();
        assert_eq!(field_names, vec!["id", "email", "name"]);

        let id = m.field("id").unwrap();
        assert!(id.is_id);
        assert_eq!(id.default_value, None);
        assert_eq!(id.attributes, vec!["@id", "@default(autoincrement())"]);
        assert!(m.field("email").unwrap().is_unique);
        assert!(m.field("name").unwrap().is_optional);
    }

    #[test]
    fn test_multi_line_model() {
        let src = r#"
model Post {
  id        Int      @id @default(autoincrement())
  title     String   @db.VarChar(255)
  published Boolean  @default(false)
  tags      String[]
  score     Float?   @default(1.5)
  author    User     @relation(fields: [authorId], references: [id])
  authorId  Int
  comments  Comment[]

  @@map("posts")
  @@index([authorId])
}
"#;
        let m = model(src, &names(&["Post", "User", "Comment"], &[]));

        assert_eq!(m.fields.len(), 8);
        assert_eq!(m.map_name.as_deref(), Some("posts"));

        let tags = m.field("tags").unwrap();
        assert!(tags.is_array);
        assert!(!tags.is_optional);
        assert_eq!(tags.type_name(), "String");

        let score = m.field("score").unwrap();
        assert!(score.is_optional);
        assert_eq!(score.default_value, Some(DefaultValue::Float(1.5)));

        let author = m.field("author").unwrap();
        assert!(author.is_relation);
        assert_eq!(author.connection_field.as_deref(), Some("authorId"));

        let comments = m.field("comments").unwrap();
        assert!(comments.is_relation);
        assert!(comments.is_array);
        assert_eq!(comments.connection_field, None);

        assert_eq!(
            m.field("published").unwrap().default_value,
            Some(DefaultValue::Boolean(false))
        );
        assert_eq!(m.field("authorId").unwrap().scalar_type(), Some(ScalarType::Int));
    }

    #[test]
    fn test_enum_and_unknown_kinds() {
        let src = "model User {\n role Role @default(USER)\n loc Unsupported(\"point\")?\n}";
        let m = model(src, &names(&["User"], &["Role"]));

        let role = m.field("role").unwrap();
        assert_eq!(role.kind, FieldKind::Enum);
        assert!(!role.is_relation);
        assert_eq!(role.default_value, Some(DefaultValue::EnumLiteral("USER".into())));

        let loc = m.field("loc").unwrap();
        assert_eq!(loc.kind, FieldKind::Unknown);
        assert!(loc.is_optional);
    }

    #[test]
    fn test_optional_marker_variants() {
        let src = "model A {\n a String ?\n b Int[]?\n c Int?[]\n d Int []\n}";
        let m = model(src, &names(&["A"], &[]));

        let flags: Vec<_> = m.fields.iter().map(|f| (f.name(), f.is_array, f.is_optional)).collect();
        assert_eq!(
            flags,
            vec![("a", false, true), ("b", true, true), ("c", true, true), ("d", true, false)]
        );
    }

    #[test]
    fn test_question_mark_anywhere_on_the_line_is_optional() {
        let m = model(r#"model A { q String @default("why?") }"#, &names(&["A"], &[]));
        let q = m.field("q").unwrap();
        assert!(q.is_optional);
        assert_eq!(q.type_name(), "String");
        assert_eq!(q.default_value, Some(DefaultValue::String("why?".into())));
    }

    #[test]
    fn test_multi_line_attribute() {
        let src = "model Post {\n author User @relation(\n  fields: [authorId],\n  references: [id]\n )\n authorId Int\n}";
        let m = model(src, &names(&["Post", "User"], &[]));

        assert_eq!(m.fields.len(), 2);
        assert_eq!(m.fields[0].connection_field.as_deref(), Some("authorId"));
    }

    #[test]
    fn test_comments_and_incomplete_lines_are_skipped() {
        let src = "model A {\n // comment line\n id Int @id // trailing\n lonely\n @unique\n}";
        let m = model(src, &names(&["A"], &[]));

        assert_eq!(m.fields.len(), 1);
        assert_eq!(m.fields[0].attributes, vec!["@id"]);
    }

    #[test]
    fn test_relation_to_unknown_model_is_not_a_relation() {
        let m = model("model A { b B }", &names(&["A"], &[]));
        assert!(!m.fields[0].is_relation);
        assert_eq!(m.fields[0].kind, FieldKind::Unknown);
    }

    #[test]
    fn test_unparsable_relation_falls_back_to_text() {
        let src = "model A {\n b B @relation(fields: [bId], references: [id], onDelete: ???)\n bId Int\n}";
        let m = model(src, &names(&["A", "B"], &[]));

        let b = m.field("b").unwrap();
        assert!(b.get_attribute("relation").is_none());
        assert_eq!(b.connection_field.as_deref(), Some("bId"));
    }

    #[test]
    fn test_id_matches_attribute_prefix() {
        let m = model(
            "model A {\n x Int @id(map: \"pk\")\n y Int @idx\n z Int @unique\n}",
            &names(&["A"], &[]),
        );
        assert!(m.field("x").unwrap().is_id);
        assert!(m.field("y").unwrap().is_id);
        assert!(!m.field("z").unwrap().is_id);
    }

    #[test]
    fn test_field_span_points_into_source() {
        let src = "model A {\n  id Int @id\n}";
        let m = model(src, &names(&["A"], &[]));
        assert_eq!(m.fields[0].span.slice(src), "id Int @id");
    }

    #[test]
    fn test_enum_values() {
        let src = "enum Role {\n  USER\n  // staff\n  ADMIN @map(\"admin\")\n  GUEST,\n  @@map(\"roles\")\n}";
        let blocks = extract_blocks(src);
        let e = parse_enum_block(&blocks.enums[0]);

        assert_eq!(e.values, vec!["USER", "ADMIN", "GUEST"]);
    }

    #[test]
    fn test_single_line_enum() {
        let blocks = extract_blocks("enum Status { ACTIVE INACTIVE, BANNED }");
        let e = parse_enum_block(&blocks.enums[0]);
        assert_eq!(e.values, vec!["ACTIVE", "INACTIVE", "BANNED"]);
    }

    #[test]
    fn test_empty_enum() {
        let blocks = extract_blocks("enum Empty {}");
        assert!(parse_enum_block(&blocks.enums[0]).values.is_empty());
    }
}
