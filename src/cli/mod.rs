//! CLI module for classmap

mod args;

pub use args::{Args, Command};

use crate::analysis::{AnalysisResult, Analyzer};
use crate::config::{CliOverrides, Config};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "classmap.toml";

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            path,
            output,
            config,
            include,
            exclude,
            keywords,
            ignore,
            format,
            dedup_usage,
            declared_kinds,
            verbose,
        } => {
            init_tracing(verbose);

            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(CliOverrides {
                output,
                include,
                exclude,
                keywords,
                ignore,
                format,
                dedup_usage,
                declared_kinds,
            })?;

            if verbose {
                eprintln!("Scanning: {}", path.display());
                eprintln!("Format: {:?}", cfg.output.format);
                eprintln!("Include: {:?}", cfg.discovery.include);
                eprintln!("Exclude: {:?}", cfg.discovery.exclude);
                if !cfg.discovery.keywords.is_empty() {
                    eprintln!("Keywords: {:?}", cfg.discovery.keywords);
                }
                eprintln!("Ignore: {:?}", cfg.diagram.ignore);
            }

            if !path.exists() {
                return Err(Error::PathNotFound(path));
            }

            if cfg.project.name == "Untitled Project" || cfg.project.name.is_empty() {
                cfg.project.name = path
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| "Project".to_string());
            }

            let analyzer = Analyzer::new(cfg.clone())?.with_verbose(verbose);

            eprintln!("Analyzing {}...", path.display());
            let analysis = analyzer.analyze(&path)?;
            report_summary(&analysis);

            let text = crate::output::render(&cfg, &analysis)?;
            write_output(cfg.output.file.as_deref(), &text)
        }

        Command::Version => {
            println!("classmap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Explicit config must load; the default file is optional
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);
            if default_path.exists() {
                Config::load(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn report_summary(analysis: &AnalysisResult) {
    let stats = analysis.stats();
    eprintln!(
        "Analysis complete: {} files, {} types ({} interfaces)",
        stats.units, stats.types, stats.interfaces
    );

    if !analysis.parse_errors.is_empty() {
        eprintln!("\nSkipped files ({}):", analysis.parse_errors.len());
        for failure in analysis.parse_errors.iter().take(5) {
            eprintln!("  {}: {}", failure.path.display(), failure.reason);
        }
        if analysis.parse_errors.len() > 5 {
            eprintln!("  ... and {} more", analysis.parse_errors.len() - 5);
        }
    }

    if !analysis.duplicates.is_empty() {
        eprintln!("\nTypes declared more than once: {}", analysis.duplicates.len());
    }
}

fn write_output(file: Option<&Path>, text: &str) -> Result<()> {
    match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
            eprintln!("Diagram written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}
