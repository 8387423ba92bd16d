use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub discovery: DiscoveryConfig,
    pub diagram: DiagramConfig,
    pub output: OutputConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

/// Which source files take part in the diagram
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Glob patterns, relative to the scanned root
    pub include: Vec<String>,
    /// Case-insensitive file name suffixes; empty keeps every included file
    pub keywords: Vec<String>,
    /// Path fragments that drop a file when contained in its path
    pub exclude: Vec<String>,
}

/// Relationship and rendering policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Name prefixes suppressed from every edge
    pub ignore: Vec<String>,
    pub duplicates: DuplicatePolicy,
    pub realization: RealizationRule,
    pub dedup_usage: bool,
    pub include_fields: bool,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Destination file; stdout when absent
    pub file: Option<PathBuf>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    PlantUml,
    Json,
}

/// How a type name declared in several places is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Union base types and members into the first record
    #[default]
    Merge,
    /// Keep the first record untouched, drop later ones
    KeepFirst,
}

/// How an inheritance edge decides between extends and realizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RealizationRule {
    /// `IFoo` style names realize, everything else extends
    #[default]
    Naming,
    /// Prefer kinds known from syntax or from the directory
    Declared,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.cs".to_string(), "**/*.java".to_string()],
            keywords: vec![],
            exclude: vec![
                "/obj/".to_string(),
                "/bin/".to_string(),
                "/node_modules/".to_string(),
                "/Migrations/".to_string(),
                ".cshtml.cs".to_string(),
                "/.git/".to_string(),
            ],
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            ignore: vec![
                "int".to_string(),
                "string".to_string(),
                "Func".to_string(),
                "BaseController".to_string(),
                "Controller".to_string(),
            ],
            duplicates: DuplicatePolicy::default(),
            realization: RealizationRule::default(),
            dedup_usage: false,
            include_fields: true,
        }
    }
}

/// CLI overrides, applied on top of a loaded config
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub keywords: Vec<String>,
    pub ignore: Vec<String>,
    pub format: Option<String>,
    pub dedup_usage: bool,
    pub declared_kinds: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: CliOverrides) -> Result<()> {
        if let Some(out) = cli.output {
            self.output.file = Some(out);
        }

        if !cli.include.is_empty() {
            self.discovery.include = cli.include;
        }

        self.discovery.exclude.extend(cli.exclude);
        self.discovery.keywords.extend(cli.keywords);
        self.diagram.ignore.extend(cli.ignore);

        if let Some(fmt) = cli.format {
            self.output.format = match fmt.as_str() {
                "plantuml" | "puml" => OutputFormat::PlantUml,
                "json" => OutputFormat::Json,
                other => return Err(Error::other(format!("Unknown format: {}", other))),
            };
        }

        if cli.dedup_usage {
            self.diagram.dedup_usage = true;
        }

        if cli.declared_kinds {
            self.diagram.realization = RealizationRule::Declared;
        }

        self.validate()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.discovery.include.is_empty() {
            return Err(Error::config_validation("at least one include pattern required"));
        }

        for pattern in &self.discovery.include {
            glob::Pattern::new(pattern)?;
        }

        if self.diagram.ignore.iter().any(|p| p.is_empty()) {
            return Err(Error::config_validation("ignore prefixes must not be empty"));
        }

        if self.discovery.exclude.iter().any(|f| f.is_empty()) {
            return Err(Error::config_validation("exclude fragments must not be empty"));
        }

        Ok(())
    }
}
