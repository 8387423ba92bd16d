// Output generation module

pub mod json;
pub mod plantuml;

pub use json::render_json;
pub use plantuml::*;

use crate::analysis::{AnalysisResult, RelationshipDeriver};
use crate::config::{Config, OutputFormat};
use crate::error::Result;

/// Derive edges and render the analysis in the configured format
pub fn render(config: &Config, analysis: &AnalysisResult) -> Result<String> {
    let deriver = RelationshipDeriver::from_config(&config.diagram);
    let edges = deriver.derive_all(&analysis.directory);

    match config.output.format {
        OutputFormat::PlantUml => Ok(DiagramEmitter::new().render(&analysis.directory, &edges)),
        OutputFormat::Json => render_json(&config.project.name, analysis, &edges),
    }
}
