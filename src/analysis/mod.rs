// Analysis module: discovery, extraction, aggregation and edge derivation

pub mod directory;
pub mod discovery;
pub mod relations;

pub use directory::*;
pub use discovery::*;
pub use relations::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{ParsedUnit, ParserSet, SourceUnit};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// A unit that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of analyzing a set of source units
#[derive(Debug)]
pub struct AnalysisResult {
    /// Every type seen, in first-seen order
    pub directory: TypeDirectory,
    /// Units that contributed records
    pub parsed_units: usize,
    /// Units skipped because they could not be read or parsed
    pub parse_errors: Vec<ParseFailure>,
    /// Type names declared in more than one place
    pub duplicates: Vec<Duplicate>,
}

impl AnalysisResult {
    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats {
            units: self.parsed_units,
            types: self.directory.len(),
            interfaces: self.directory.interface_count(),
            failures: self.parse_errors.len(),
            duplicates: self.duplicates.len(),
        }
    }
}

/// Counts for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStats {
    pub units: usize,
    pub types: usize,
    pub interfaces: usize,
    pub failures: usize,
    pub duplicates: usize,
}

/// Main analyzer that orchestrates the pipeline
pub struct Analyzer {
    config: Config,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            verbose: false,
        })
    }

    /// Show a progress bar while extracting
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find the source files under `root`, sorted by path
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        discover_files(root, &self.config.discovery)
    }

    /// Analyze every selected file under `root`
    pub fn analyze(&self, root: &Path) -> Result<AnalysisResult> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let files = self.discover(root)?;
        let (units, mut unreadable) = read_units(&files);

        let mut result = self.analyze_sources(units)?;
        unreadable.append(&mut result.parse_errors);
        unreadable.sort_by(|a, b| a.path.cmp(&b.path));
        result.parse_errors = unreadable;

        Ok(result)
    }

    /// Analyze already loaded units, keeping their order.
    ///
    /// Extraction runs in parallel; results are merged in input order.
    pub fn analyze_sources(&self, units: Vec<SourceUnit>) -> Result<AnalysisResult> {
        let progress = self.progress_bar(units.len());

        let outcomes: Vec<Result<ParsedUnit>> = units
            .par_iter()
            .map_init(ParserSet::new, |parsers, unit| {
                let outcome = parsers.parse(unit);
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
                outcome
            })
            .collect();

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let mut parsed = Vec::with_capacity(units.len());
        let mut parse_errors = Vec::new();

        for (unit, outcome) in units.iter().zip(outcomes) {
            match outcome {
                Ok(parsed_unit) => {
                    tracing::debug!(
                        path = %unit.path.display(),
                        types = parsed_unit.types.len(),
                        "extracted unit"
                    );
                    parsed.push(parsed_unit);
                }
                Err(Error::Parse { path, message }) => {
                    tracing::warn!(path = %path.display(), reason = %message, "skipping unit");
                    parse_errors.push(ParseFailure {
                        path,
                        reason: message,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let parsed_units = parsed.len();
        let (directory, duplicates) = TypeDirectory::build(parsed, self.config.diagram.duplicates);

        Ok(AnalysisResult {
            directory,
            parsed_units,
            parse_errors,
            duplicates,
        })
    }

    /// Relationship deriver configured from the diagram settings
    pub fn deriver(&self) -> RelationshipDeriver {
        RelationshipDeriver::from_config(&self.config.diagram)
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.verbose {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} units")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Some(pb)
    }
}

/// Read files as UTF-8, reporting the ones that cannot be read
fn read_units(files: &[PathBuf]) -> (Vec<SourceUnit>, Vec<ParseFailure>) {
    let mut units = Vec::with_capacity(files.len());
    let mut failures = Vec::new();

    for path in files {
        match std::fs::read_to_string(path) {
            Ok(text) => units.push(SourceUnit::new(path.clone(), text)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                failures.push(ParseFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (units, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use std::fs;
    use tempfile::TempDir;

    fn analyzer() -> Analyzer {
        Analyzer::new(Config::default()).unwrap()
    }

    #[test]
    fn test_analyzer_new_validates() {
        let mut config = Config::default();
        config.discovery.include.clear();
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_with_verbose() {
        let analyzer = analyzer().with_verbose(true);
        assert!(analyzer.verbose);
    }

    #[test]
    fn test_analyze_sources_keeps_input_order() {
        let units = vec![
            SourceUnit::new("b/Second.cs", "class Second { }"),
            SourceUnit::new("a/First.cs", "class First { }"),
        ];
        let result = analyzer().analyze_sources(units).unwrap();
        let names: Vec<&str> = result.directory.names().collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(result.stats().units, 2);
    }

    #[test]
    fn test_parse_failure_isolation() {
        let units = vec![
            SourceUnit::new("A.cs", "class A { }"),
            SourceUnit::new("B.cs", "class B : { broken"),
            SourceUnit::new("C.cs", "class C { }"),
            SourceUnit::new("D.cs", "interface ID { }"),
        ];
        let result = analyzer().analyze_sources(units).unwrap();

        let names: Vec<&str> = result.directory.names().collect();
        assert_eq!(names, vec!["A", "C", "ID"]);
        assert_eq!(result.parse_errors.len(), 1);
        assert_eq!(result.parse_errors[0].path, PathBuf::from("B.cs"));
        assert_eq!(result.stats().failures, 1);
    }

    #[test]
    fn test_member_outside_type_skips_only_that_unit() {
        let units = vec![
            SourceUnit::new("Good.cs", "class Good { D d; }"),
            SourceUnit::new("Stray.cs", "namespace N { C Other; }"),
        ];
        let result = analyzer().analyze_sources(units).unwrap();

        let names: Vec<&str> = result.directory.names().collect();
        assert_eq!(names, vec!["Good"]);
        assert_eq!(result.parse_errors.len(), 1);
        assert_eq!(result.parse_errors[0].path, PathBuf::from("Stray.cs"));
        assert!(result.parse_errors[0].reason.contains("outside any type"));
    }

    #[test]
    fn test_duplicates_reported() {
        let units = vec![
            SourceUnit::new("One.cs", "partial class Foo { Left A { get; set; } }"),
            SourceUnit::new("Two.cs", "partial class Foo { Right B { get; set; } }"),
        ];
        let result = analyzer().analyze_sources(units).unwrap();
        assert_eq!(result.directory.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.directory.get("Foo").unwrap().members.len(), 2);
    }

    #[test]
    fn test_keep_first_from_config() {
        let mut config = Config::default();
        config.diagram.duplicates = DuplicatePolicy::KeepFirst;
        let units = vec![
            SourceUnit::new("One.cs", "partial class Foo { Left A { get; set; } }"),
            SourceUnit::new("Two.cs", "partial class Foo { Right B { get; set; } }"),
        ];
        let result = Analyzer::new(config)
            .unwrap()
            .analyze_sources(units)
            .unwrap();
        assert_eq!(result.directory.get("Foo").unwrap().members.len(), 1);
    }

    #[test]
    fn test_analyze_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Services")).unwrap();
        fs::write(
            dir.path().join("Services/OrderService.cs"),
            "class OrderService : IOrderService { OrderDao Dao { get; set; } }",
        )
        .unwrap();
        fs::write(dir.path().join("IOrderService.cs"), "interface IOrderService { }").unwrap();
        fs::write(dir.path().join("Latin1.cs"), [0x63, 0xe9, 0xff]).unwrap();

        let result = analyzer().analyze(dir.path()).unwrap();
        let names: Vec<&str> = result.directory.names().collect();
        assert_eq!(names, vec!["IOrderService", "OrderService"]);
        assert_eq!(result.parse_errors.len(), 1);
        assert!(result.parse_errors[0].path.ends_with("Latin1.cs"));
    }

    #[test]
    fn test_analyze_missing_path() {
        let result = analyzer().analyze(Path::new("/nonexistent/classmap-project"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_analyze_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = analyzer().analyze(dir.path()).unwrap();
        assert!(result.directory.is_empty());
        assert!(result.parse_errors.is_empty());
    }
}
