// PlantUML class diagram emission
//
// Pure text generation: the caller decides where the text goes.

use crate::analysis::{InheritanceEdge, InheritanceStyle, TypeDirectory, TypeEdges, UsageEdge};
use crate::parser::{TypeKind, TypeRecord};

pub const START_MARKER: &str = "@startuml";
pub const END_MARKER: &str = "@enduml";

/// Renders a type directory and its edges as PlantUML
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramEmitter;

impl DiagramEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Diagram lines, without line terminators.
    ///
    /// `edges[i]` belongs to the i-th record of the directory; records past
    /// the end of `edges` get a declaration line only.
    pub fn render_lines(&self, directory: &TypeDirectory, edges: &[TypeEdges]) -> Vec<String> {
        let mut lines = vec![START_MARKER.to_string()];

        for (i, record) in directory.iter().enumerate() {
            lines.push(declaration_line(record));
            if let Some(type_edges) = edges.get(i) {
                lines.extend(type_edges.inheritance.iter().map(inheritance_line));
                lines.extend(type_edges.usage.iter().map(usage_line));
            }
        }

        lines.push(END_MARKER.to_string());
        lines
    }

    /// The whole diagram, one `\n`-terminated line each
    pub fn render(&self, directory: &TypeDirectory, edges: &[TypeEdges]) -> String {
        let mut text = self.render_lines(directory, edges).join("\n");
        text.push('\n');
        text
    }
}

fn declaration_line(record: &TypeRecord) -> String {
    match record.kind {
        TypeKind::Interface => format!("interface {}", record.name),
        TypeKind::Class => format!("class {}", record.name),
    }
}

fn inheritance_line(edge: &InheritanceEdge) -> String {
    let arrow = match edge.style {
        InheritanceStyle::Realizes => "<|..",
        InheritanceStyle::Extends => "<|--",
    };
    format!("{} {} {}", edge.base, arrow, edge.derived)
}

fn usage_line(edge: &UsageEdge) -> String {
    format!("{} --> {}: Use", edge.user, edge.used)
}
