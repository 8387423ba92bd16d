// Parser module for extracting type declarations from source files

pub mod ast;
mod csharp;
mod java;
mod walker;

pub use ast::*;
pub use csharp::CSharpParser;
pub use java::JavaParser;

use crate::error::{Error, Result};

/// Lazily created parsers, one per language, owned by a single worker
#[derive(Default)]
pub struct ParserSet {
    csharp: Option<CSharpParser>,
    java: Option<JavaParser>,
}

impl ParserSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the type records of one unit, dispatching on its extension
    pub fn parse(&mut self, unit: &SourceUnit) -> Result<ParsedUnit> {
        match unit.language() {
            Some(Language::CSharp) => {
                if self.csharp.is_none() {
                    self.csharp = Some(CSharpParser::new()?);
                }
                let parser = self
                    .csharp
                    .as_mut()
                    .ok_or_else(|| Error::parser("C# parser unavailable"))?;
                parser.parse_source(&unit.text, &unit.path)
            }
            Some(Language::Java) => {
                if self.java.is_none() {
                    self.java = Some(JavaParser::new()?);
                }
                let parser = self
                    .java
                    .as_mut()
                    .ok_or_else(|| Error::parser("Java parser unavailable"))?;
                parser.parse_source(&unit.text, &unit.path)
            }
            None => Err(Error::parse(&unit.path, "unsupported source language")),
        }
    }
}
