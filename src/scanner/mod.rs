//! Scanner module - Source files by language and type
//!
//! Every analyzable file is tagged with its [`Language`] and its type: a
//! file is a test file when it matches one of the configured test patterns,
//! a main file otherwise.

mod filesystem;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ScannerConfig;
use crate::error::ConfigError;
use crate::languages::Language;
use crate::rules::Scope;

/// A source file of the analyzed project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the project root, with `/` separators
    pub relative_path: String,
    pub language: Language,
    /// Either [`Scope::Main`] or [`Scope::Test`]
    pub file_type: Scope,
}

/// The set of source files of a project
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    files: Vec<InputFile>,
}

impl Scanner {
    /// Scan `root` for source files of the known languages
    pub fn new(root: PathBuf, config: &ScannerConfig) -> Result<Self, ConfigError> {
        let tests = build_globset(&config.test_patterns)?;
        let excluded = build_globset(&config.exclude)?;

        let files = filesystem::scan_directory(&root)
            .into_iter()
            .filter_map(|relative| {
                let language = Language::from_path(&relative)?;
                let relative_path = to_slash(&relative);
                if excluded.is_match(&relative_path) {
                    return None;
                }
                let file_type = if tests.is_match(&relative_path) {
                    Scope::Test
                } else {
                    Scope::Main
                };
                Some(InputFile {
                    path: root.join(&relative),
                    relative_path,
                    language,
                    file_type,
                })
            })
            .collect::<Vec<_>>();

        debug!(root = %root.display(), files = files.len(), "Scanned source files");
        Ok(Self { root, files })
    }

    /// Build a scanner over an explicit list of files
    pub fn from_files(root: PathBuf, files: Vec<InputFile>) -> Self {
        Self { root, files }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn all_files(&self) -> &[InputFile] {
        &self.files
    }

    /// Files of `language` whose type matches `scope`
    pub fn files(&self, language: Language, scope: Scope) -> Vec<&InputFile> {
        self.files
            .iter()
            .filter(|f| f.language == language && f.file_type.applies_to(scope))
            .collect()
    }

    /// Check if any file of `language` matches `scope`
    pub fn has_files(&self, language: Language, scope: Scope) -> bool {
        self.files
            .iter()
            .any(|f| f.language == language && f.file_type.applies_to(scope))
    }

    /// Find a file by absolute path, or by path relative to the root
    pub fn find(&self, path: &Path) -> Option<&InputFile> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        self.files.iter().find(|f| f.path == absolute).or_else(|| {
            let relative = to_slash(path);
            self.files.iter().find(|f| f.relative_path == relative)
        })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
