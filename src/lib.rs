//! Classmap - Generate class diagrams from codebases
//!
//! Extracts type declarations, base-type lists and member types from C# and
//! Java sources and renders them as a deterministic PlantUML class diagram.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{
    AnalysisResult, Analyzer, IgnorePolicy, RelationshipDeriver, TypeDirectory, TypeEdges,
};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{render, DiagramEmitter};
pub use parser::{SourceUnit, TypeKind, TypeRecord};
