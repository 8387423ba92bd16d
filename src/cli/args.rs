//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate PlantUML class diagrams from C# and Java codebases
#[derive(Parser, Debug)]
#[command(name = "classmap")]
#[command(about = "Generate PlantUML class diagrams from C# and Java codebases")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a codebase and write its class diagram
    Generate {
        /// Path to the codebase to scan
        path: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Glob patterns to include (can be repeated, replaces the configured list)
        #[arg(long)]
        include: Vec<String>,

        /// Path fragments to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// File name suffixes to keep, case-insensitive (can be repeated)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Type name prefixes to leave out of edges (can be repeated)
        #[arg(long)]
        ignore: Vec<String>,

        /// Output format (plantuml, json)
        #[arg(long)]
        format: Option<String>,

        /// Emit one usage edge per target type
        #[arg(long)]
        dedup_usage: bool,

        /// Classify bases by declared kind before falling back to names
        #[arg(long)]
        declared_kinds: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}
