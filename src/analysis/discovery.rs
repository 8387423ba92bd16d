// Source file discovery: include globs, file name keywords, excluded fragments

use crate::config::DiscoveryConfig;
use crate::error::Result;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// `*.cs` also selects `FOO.CS`, like the keyword test
const INCLUDE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Path-based selection rules, compiled once
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Pattern>,
    keywords: Vec<String>,
    exclude: Vec<String>,
}

impl FileFilter {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let include = config
            .include
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            include,
            keywords: config.keywords.iter().map(|k| k.to_uppercase()).collect(),
            exclude: config.exclude.clone(),
        })
    }

    /// Check a path given relative to the scanned root
    pub fn accepts(&self, relative: &Path) -> bool {
        let relative = to_slash(relative);

        if !self
            .include
            .iter()
            .any(|p| p.matches_with(&relative, INCLUDE_MATCH))
        {
            return false;
        }

        // Leading slash lets `/obj/` match a top-level `obj` directory
        let anchored = format!("/{}", relative);
        if self.exclude.iter().any(|fragment| anchored.contains(fragment.as_str())) {
            return false;
        }

        if self.keywords.is_empty() {
            return true;
        }
        let file_name = relative
            .rsplit('/')
            .next()
            .unwrap_or(&relative)
            .to_uppercase();
        self.keywords.iter().any(|k| file_name.ends_with(k.as_str()))
    }
}

/// Walk `root` and return the selected files, sorted
pub fn discover_files(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let filter = FileFilter::new(config)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if filter.accepts(relative) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered source files");
    Ok(files)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
