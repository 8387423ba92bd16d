// JSON dump of the type model and its derived edges

use crate::analysis::{AnalysisResult, TypeEdges};
use crate::error::Result;
use crate::parser::TypeRecord;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ModelReport<'a> {
    project: &'a str,
    types: Vec<TypeReport<'a>>,
    skipped: Vec<SkippedUnit<'a>>,
}

#[derive(Serialize)]
struct TypeReport<'a> {
    #[serde(flatten)]
    record: &'a TypeRecord,
    origin: Option<&'a Path>,
    edges: Option<&'a TypeEdges>,
}

#[derive(Serialize)]
struct SkippedUnit<'a> {
    path: &'a Path,
    reason: &'a str,
}

/// Pretty-printed JSON for the analysis, types in directory order
pub fn render_json(
    project: &str,
    analysis: &AnalysisResult,
    edges: &[TypeEdges],
) -> Result<String> {
    let directory = &analysis.directory;
    let report = ModelReport {
        project,
        types: directory
            .iter()
            .enumerate()
            .map(|(i, record)| TypeReport {
                record,
                origin: directory.origin(&record.name),
                edges: edges.get(i),
            })
            .collect(),
        skipped: analysis
            .parse_errors
            .iter()
            .map(|f| SkippedUnit {
                path: &f.path,
                reason: &f.reason,
            })
            .collect(),
    };

    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}
