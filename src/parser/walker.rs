// Declaration walk shared by every tree-sitter grammar
//
// The walk flattens nested declarations into one ordered list. The record
// that owns the members being visited travels down the recursion as an index
// into that list.

use crate::error::{Error, Result};
use crate::parser::ast::{BaseType, Language, MemberRecord, ParsedUnit, TypeKind, TypeRecord};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Node-level knowledge of one source language
pub(crate) trait Grammar {
    /// Kind of the type declared by `node`, if it is a type declaration
    fn type_kind(&self, node: &Node) -> Option<TypeKind>;

    /// Entries of the declaration's inheritance clause, left to right
    fn base_types(&self, decl: &Node, source: &[u8]) -> Vec<BaseType>;

    /// Node holding the declaration's members
    fn body<'t>(&self, decl: &Node<'t>) -> Option<Node<'t>>;

    /// Members declared by `node`, or `None` if it is not property-like
    fn members(&self, node: &Node, source: &[u8]) -> Option<Vec<MemberRecord>>;

    /// Whether `node` groups further members of the body it sits in
    fn is_body_section(&self, _node: &Node) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy)]
struct WalkContext {
    owner: Option<usize>,
}

impl WalkContext {
    fn top_level() -> Self {
        Self { owner: None }
    }

    fn inside(owner: usize) -> Self {
        Self { owner: Some(owner) }
    }
}

/// Parse `source` and extract its type records
pub(crate) fn parse_unit<G: Grammar>(
    parser: &mut Parser,
    grammar: &G,
    language: Language,
    source: &str,
    path: &Path,
) -> Result<ParsedUnit> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::parse(path, "parser produced no syntax tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(Error::parse(path, describe_error(root)));
    }

    let mut types = Vec::new();
    walk(
        grammar,
        root,
        source.as_bytes(),
        path,
        WalkContext::top_level(),
        &mut types,
    )?;

    Ok(ParsedUnit {
        path: path.to_path_buf(),
        language,
        types,
    })
}

fn walk<G: Grammar>(
    grammar: &G,
    node: Node,
    source: &[u8],
    path: &Path,
    ctx: WalkContext,
    out: &mut Vec<TypeRecord>,
) -> Result<()> {
    if let Some(kind) = grammar.type_kind(&node) {
        return visit_type(grammar, node, kind, source, path, out);
    }

    if let Some(members) = grammar.members(&node, source) {
        let pos = node.start_position();
        // Parses cleanly in some grammars (C# namespace bodies) but is not valid code
        let Some(owner) = ctx.owner else {
            return Err(Error::parse(
                path,
                format!("member outside any type at {}:{}", pos.row + 1, pos.column + 1),
            ));
        };
        let record = out
            .get_mut(owner)
            .ok_or(Error::MissingMemberOwner { line: pos.row + 1 })?;
        record.members.extend(members);
        return Ok(());
    }

    // Inside a body only nested types and members count; method bodies are skipped
    if ctx.owner.is_none() || grammar.is_body_section(&node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            walk(grammar, child, source, path, ctx, out)?;
        }
    }

    Ok(())
}

fn visit_type<G: Grammar>(
    grammar: &G,
    decl: Node,
    kind: TypeKind,
    source: &[u8],
    path: &Path,
    out: &mut Vec<TypeRecord>,
) -> Result<()> {
    let Some(name) = decl
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
    else {
        return Ok(());
    };

    let mut record = TypeRecord::new(name, kind, decl.start_position().row + 1);
    record.base_types = grammar.base_types(&decl, source);

    let index = out.len();
    out.push(record);

    if let Some(body) = grammar.body(&decl) {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            walk(
                grammar,
                child,
                source,
                path,
                WalkContext::inside(index),
                out,
            )?;
        }
    }

    Ok(())
}

/// Locate the first syntax error for the failure report.
///
/// Falls back to the deepest node still flagged `has_error()` when no
/// ERROR or MISSING node is reachable, so a position is always reported.
fn describe_error(root: Node) -> String {
    if let Some(node) = first_error(root) {
        let pos = node.start_position();
        if node.is_missing() {
            return format!("missing `{}` at {}:{}", node.kind(), pos.row + 1, pos.column + 1);
        }
        return format!("syntax error at {}:{}", pos.row + 1, pos.column + 1);
    }

    let pos = deepest_with_error(root).start_position();
    format!("syntax error at {}:{}", pos.row + 1, pos.column + 1)
}

fn deepest_with_error(node: Node) -> Node {
    let mut cursor = node.walk();
    let next = node.children(&mut cursor).find(|c| c.has_error());
    match next {
        Some(child) => deepest_with_error(child),
        None => node,
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

pub(crate) fn node_text<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source).ok().map(str::trim)
}

pub(crate) fn child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Named children, minus comments that tree-sitter attaches anywhere
pub(crate) fn type_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment" && !c.kind().ends_with("_comment"))
        .collect();
    children
}

/// Member names of every `variable_declarator` under `node`
pub(crate) fn declarator_names<'s>(node: &Node, source: &'s [u8]) -> Vec<&'s str> {
    let mut cursor = node.walk();
    let declarators: Vec<Node> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "variable_declarator")
        .collect();

    declarators
        .iter()
        .filter_map(|d| {
            d.child_by_field_name("name")
                .or_else(|| child_of_kind(d, "identifier"))
                .and_then(|n| node_text(&n, source))
        })
        .collect()
}
