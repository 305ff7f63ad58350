//! Command-line engine adapter
//!
//! Runs the engine executable once per request:
//!
//! ```text
//! pmd check --no-cache --no-progress --file-list <list> -R <ruleset> -f xml -r <report>
//!     [--use-version java-<version>] [--aux-classpath file:<classpath list>] <extra args>
//! ```
//!
//! The report written by the engine is parsed back into an
//! [`AnalysisReport`].

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{report_xml, AnalysisEngine, AnalysisReport, EngineRequest};
use crate::error::{ConfigError, EngineError};
use crate::languages::Language;
use crate::utils::command::execute_command;

/// First Java version the engine does not support
pub const JAVA_SOURCE_MINIMUM_UNSUPPORTED_VALUE: &str = "21";

/// Highest Java version the engine supports
pub const JAVA_SOURCE_MAXIMUM_SUPPORTED_VALUE: &str = "20-preview";

/// Exit codes meaning the engine ran to completion: clean, violations found,
/// recoverable errors
const SUCCESS_EXIT_CODES: [i32; 3] = [0, 4, 5];

/// Engine driven through its command-line interface
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
        }
    }

    /// Locate `command` on PATH (or take it as a path) and build an engine
    pub fn locate(command: &str, extra_args: Vec<String>) -> Result<Self, EngineError> {
        let program =
            which::which(command).map_err(|_| EngineError::NotFound(command.to_string()))?;
        debug!(program = %program.display(), "Located engine executable");
        Ok(Self::new(program, extra_args))
    }

    /// Full argument list for one invocation
    pub fn arguments(
        &self,
        request: &EngineRequest<'_>,
        file_list: &Path,
        report: &Path,
        classpath_file: Option<&Path>,
    ) -> Vec<String> {
        let mut args = vec![
            "check".to_string(),
            "--no-cache".to_string(),
            "--no-progress".to_string(),
            "--file-list".to_string(),
            file_list.display().to_string(),
            "-R".to_string(),
            request.ruleset_path.display().to_string(),
            "-f".to_string(),
            "xml".to_string(),
            "-r".to_string(),
            report.display().to_string(),
        ];

        if request.language == Language::Java {
            args.push("--use-version".to_string());
            args.push(format!("java-{}", request.java_source_version));
        }

        if let Some(classpath_file) = classpath_file {
            args.push("--aux-classpath".to_string());
            args.push(format!("file:{}", classpath_file.display()));
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl AnalysisEngine for CommandEngine {
    fn name(&self) -> &str {
        "pmd-cli"
    }

    fn run(&self, request: &EngineRequest<'_>) -> Result<AnalysisReport, EngineError> {
        let scratch = request.context.scratch_dir();
        let prefix = format!("{}-{}", request.language.key(), request.scope.as_str());

        let file_list = scratch.join(format!("{}-files.txt", prefix));
        let listing = request
            .files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&file_list, listing).map_err(|source| EngineError::Input {
            path: file_list.display().to_string(),
            source,
        })?;

        let report_path = scratch.join(format!("{}-report.xml", prefix));
        let classpath_file = request.context.write_classpath_file()?;
        let args = self.arguments(request, &file_list, &report_path, classpath_file.as_deref());

        debug!(program = %self.program.display(), args = ?args, "Engine command line");

        let result = execute_command(&self.program, &args, None).map_err(|source| {
            EngineError::Spawn {
                program: self.program.display().to_string(),
                source,
            }
        })?;

        if !SUCCESS_EXIT_CODES.contains(&result.exit_code) {
            return Err(EngineError::Failed {
                program: self.program.display().to_string(),
                code: result.exit_code,
                stderr: result.stderr,
            });
        }
        if !result.stderr.is_empty() {
            debug!(stderr = %result.stderr, "Engine diagnostics");
        }

        let document = fs::read_to_string(&report_path).map_err(|e| EngineError::Report {
            path: report_path.display().to_string(),
            message: e.to_string(),
        })?;
        report_xml::parse(&document).map_err(|e| EngineError::Report {
            path: report_path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Java language version to request from the engine.
///
/// The `-preview` suffix is dropped. Versions at or above the first
/// unsupported one fall back to the highest supported version, and legacy
/// `1.x` spellings are normalized. A version that is not a number is a
/// configuration error.
pub fn java_language_version(requested: &str) -> Result<String, ConfigError> {
    let requested = requested.trim();
    let bare = match requested.find("-preview") {
        Some(index) => &requested[..index],
        None => requested,
    };

    let version = bare
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidJavaVersion(requested.to_string()))?;
    let limit = JAVA_SOURCE_MINIMUM_UNSUPPORTED_VALUE
        .parse::<f32>()
        .unwrap_or(f32::MAX);
    if version >= limit {
        warn!(
            requested,
            using = JAVA_SOURCE_MAXIMUM_SUPPORTED_VALUE,
            "Requested Java version is not supported by the engine"
        );
        return Ok(JAVA_SOURCE_MAXIMUM_SUPPORTED_VALUE.to_string());
    }

    Ok(normalize_java_version(bare))
}

fn normalize_java_version(version: &str) -> String {
    if version == "8" {
        return "1.8".to_string();
    }
    if let Some(rest) = version.strip_prefix("1.") {
        if rest.parse::<u32>().is_ok_and(|major| major >= 9) {
            return rest.to_string();
        }
    }
    version.to_string()
}
