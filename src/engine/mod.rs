//! Analysis engine seam
//!
//! The engine is a black box: it receives a file list and a ruleset and
//! returns an [`AnalysisReport`]. Problems the engine reports about single
//! files or rules are data in the report; only a failed invocation is an
//! error.

pub mod command;
pub mod context;
pub mod report_xml;

pub use command::CommandEngine;
pub use context::{ambient_classpath, ExecutionContext};

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::languages::Language;
use crate::rules::Scope;
use crate::scanner::InputFile;

/// A finding reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Engine rule name; the active rule key
    pub rule_name: String,
    pub file_path: PathBuf,
    pub begin_line: i64,
    pub end_line: i64,
    pub description: String,
}

/// A file the engine failed to process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingError {
    pub file_path: String,
    pub message: String,
}

/// A rule the engine could not configure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationError {
    pub rule_name: String,
    pub message: String,
}

/// Outcome of one or more engine runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub violations: Vec<Violation>,
    pub processing_errors: Vec<ProcessingError>,
    pub configuration_errors: Vec<ConfigurationError>,
}

impl AnalysisReport {
    /// Append every entry of `other`; nothing is deduplicated
    pub fn merge(&mut self, other: AnalysisReport) {
        self.violations.extend(other.violations);
        self.processing_errors.extend(other.processing_errors);
        self.configuration_errors.extend(other.configuration_errors);
    }

    /// Union of two reports
    pub fn union(mut self, other: AnalysisReport) -> Self {
        self.merge(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
            && self.processing_errors.is_empty()
            && self.configuration_errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.processing_errors.is_empty() || !self.configuration_errors.is_empty()
    }
}

impl FromIterator<AnalysisReport> for AnalysisReport {
    fn from_iter<T: IntoIterator<Item = AnalysisReport>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), Self::union)
    }
}

/// One engine invocation: the files of a language and scope against a
/// written ruleset
#[derive(Debug)]
pub struct EngineRequest<'a> {
    pub language: Language,
    pub scope: Scope,
    pub files: Vec<&'a InputFile>,
    pub ruleset_path: &'a Path,
    pub rule_count: usize,
    pub context: &'a ExecutionContext,
    /// Java language version for the engine, already resolved by
    /// [`command::java_language_version`]
    pub java_source_version: &'a str,
}

/// An analysis engine
pub trait AnalysisEngine: Send + Sync {
    /// Engine name, for logging
    fn name(&self) -> &str;

    /// Run the engine for one request
    fn run(&self, request: &EngineRequest<'_>) -> Result<AnalysisReport, EngineError>;
}
