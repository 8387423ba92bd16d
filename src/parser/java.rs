// Java parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::{BaseType, Language, MemberRecord, ParsedUnit, TypeKind};
use crate::parser::walker::{
    self, child_of_kind, declarator_names, node_text, type_children, Grammar,
};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parser for Java source files
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    /// Create a new Java parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set Java language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Extract the type records of one Java unit
    pub fn parse_source(&mut self, source: &str, path: &Path) -> Result<ParsedUnit> {
        walker::parse_unit(&mut self.parser, &JavaGrammar, Language::Java, source, path)
    }
}

struct JavaGrammar;

impl JavaGrammar {
    /// Types listed under `clause`, either directly or through a `type_list`
    fn clause_types(clause: &Node, kind: TypeKind, source: &[u8]) -> Vec<BaseType> {
        let holder = child_of_kind(clause, "type_list").unwrap_or(*clause);
        type_children(&holder)
            .iter()
            .filter_map(|n| node_text(n, source))
            .map(|text| BaseType::declared(text, kind))
            .collect()
    }
}

impl Grammar for JavaGrammar {
    fn type_kind(&self, node: &Node) -> Option<TypeKind> {
        match node.kind() {
            "class_declaration" | "enum_declaration" | "record_declaration" => {
                Some(TypeKind::Class)
            }
            "interface_declaration" => Some(TypeKind::Interface),
            _ => None,
        }
    }

    fn base_types(&self, decl: &Node, source: &[u8]) -> Vec<BaseType> {
        let mut bases = Vec::new();

        if let Some(superclass) = child_of_kind(decl, "superclass") {
            bases.extend(Self::clause_types(&superclass, TypeKind::Class, source));
        }
        if let Some(interfaces) = child_of_kind(decl, "super_interfaces") {
            bases.extend(Self::clause_types(&interfaces, TypeKind::Interface, source));
        }
        // interface Foo extends Bar, Baz
        if let Some(extended) = child_of_kind(decl, "extends_interfaces") {
            bases.extend(Self::clause_types(&extended, TypeKind::Interface, source));
        }

        bases
    }

    fn body<'t>(&self, decl: &Node<'t>) -> Option<Node<'t>> {
        decl.child_by_field_name("body")
    }

    fn members(&self, node: &Node, source: &[u8]) -> Option<Vec<MemberRecord>> {
        match node.kind() {
            "field_declaration" | "constant_declaration" => {
                let ty = node.child_by_field_name("type")?;
                let ty = node_text(&ty, source)?;
                Some(
                    declarator_names(node, source)
                        .into_iter()
                        .map(|name| MemberRecord::field(name, ty))
                        .collect(),
                )
            }
            _ => None,
        }
    }

    fn is_body_section(&self, node: &Node) -> bool {
        node.kind() == "enum_body_declarations"
    }
}
