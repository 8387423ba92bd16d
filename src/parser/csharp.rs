// C# parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::{BaseType, Language, MemberRecord, ParsedUnit, TypeKind};
use crate::parser::walker::{
    self, child_of_kind, declarator_names, node_text, type_children, Grammar,
};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parser for C# source files
pub struct CSharpParser {
    parser: Parser,
}

impl CSharpParser {
    /// Create a new C# parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set C# language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Extract the type records of one C# unit
    pub fn parse_source(&mut self, source: &str, path: &Path) -> Result<ParsedUnit> {
        walker::parse_unit(&mut self.parser, &CSharpGrammar, Language::CSharp, source, path)
    }
}

struct CSharpGrammar;

impl Grammar for CSharpGrammar {
    fn type_kind(&self, node: &Node) -> Option<TypeKind> {
        match node.kind() {
            "class_declaration"
            | "struct_declaration"
            | "record_declaration"
            | "record_struct_declaration" => Some(TypeKind::Class),
            "interface_declaration" => Some(TypeKind::Interface),
            _ => None,
        }
    }

    fn base_types(&self, decl: &Node, source: &[u8]) -> Vec<BaseType> {
        let Some(list) = child_of_kind(decl, "base_list") else {
            return vec![];
        };

        type_children(&list)
            .into_iter()
            .filter(|n| n.kind() != "argument_list")
            .filter_map(|n| {
                // `record R(int X) : Base(X)` wraps the type with its arguments
                let ty = if n.kind() == "primary_constructor_base_type" {
                    type_children(&n).into_iter().next()?
                } else {
                    n
                };
                node_text(&ty, source)
            })
            .filter(|text| !text.is_empty())
            .map(BaseType::new)
            .collect()
    }

    fn body<'t>(&self, decl: &Node<'t>) -> Option<Node<'t>> {
        decl.child_by_field_name("body")
            .or_else(|| child_of_kind(decl, "declaration_list"))
    }

    fn members(&self, node: &Node, source: &[u8]) -> Option<Vec<MemberRecord>> {
        match node.kind() {
            "property_declaration" => {
                let ty = node.child_by_field_name("type")?;
                let name = node.child_by_field_name("name")?;
                Some(vec![MemberRecord::property(
                    node_text(&name, source)?,
                    node_text(&ty, source)?,
                )])
            }
            "field_declaration" => {
                let decl = child_of_kind(node, "variable_declaration")?;
                let ty = decl.child_by_field_name("type").or_else(|| {
                    type_children(&decl)
                        .into_iter()
                        .find(|c| c.kind() != "variable_declarator")
                })?;
                let ty = node_text(&ty, source)?;
                Some(
                    declarator_names(&decl, source)
                        .into_iter()
                        .map(|name| MemberRecord::field(name, ty))
                        .collect(),
                )
            }
            _ => None,
        }
    }
}
