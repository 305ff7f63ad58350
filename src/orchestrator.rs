//! Analysis orchestration
//!
//! Runs the engine once per language and file type, under one isolated
//! execution context, and unions the per-pass reports.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, span, Level};

use crate::config::Config;
use crate::engine::command::java_language_version;
use crate::engine::{AnalysisEngine, AnalysisReport, EngineRequest, ExecutionContext};
use crate::error::{BridgeError, ConfigError};
use crate::languages::Language;
use crate::rules::{ActiveRules, Scope, ScopeRegistry};
use crate::ruleset::{RuleSetSynthesizer, SynthesizedRuleSet};
use crate::scanner::Scanner;
use crate::utils::timing::{ExecutionTiming, PassTiming, Timer};

/// File name of the combined report dump
pub const REPORT_FILENAME: &str = "pmd-result.xml";

/// Run settings taken from the configuration
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Directory receiving rulesets and the report dump
    pub work_dir: PathBuf,
    pub generate_xml: bool,
    pub languages: Vec<Language>,
    /// Classpath entries, relative to the project root unless absolute
    pub dependencies: Vec<PathBuf>,
    pub java_source_version: String,
}

impl ExecutionOptions {
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            work_dir: config.work_dir(root),
            generate_xml: config.generate_xml,
            languages: config.languages.clone(),
            dependencies: config.dependencies.clone(),
            java_source_version: config.java_source_version.clone(),
        }
    }
}

/// Drives the engine over every language and file type of a project
pub struct ExecutionOrchestrator<'a> {
    registry: &'a ScopeRegistry,
    rules: &'a ActiveRules,
    scanner: &'a Scanner,
    engine: &'a dyn AnalysisEngine,
    options: ExecutionOptions,
}

impl<'a> ExecutionOrchestrator<'a> {
    pub fn new(
        registry: &'a ScopeRegistry,
        rules: &'a ActiveRules,
        scanner: &'a Scanner,
        engine: &'a dyn AnalysisEngine,
        options: ExecutionOptions,
    ) -> Self {
        Self {
            registry,
            rules,
            scanner,
            engine,
            options,
        }
    }

    /// Run the analysis and return the union of every pass's report
    pub fn execute(&self) -> Result<AnalysisReport, BridgeError> {
        self.execute_timed().map(|(report, _)| report)
    }

    /// Run the analysis, also returning per-pass timings.
    ///
    /// The Java source version is resolved before the engine is first called.
    /// The ambient classpath is restored and the execution context released
    /// on every exit path. A failure to release the context is logged only.
    pub fn execute_timed(&self) -> Result<(AnalysisReport, ExecutionTiming), BridgeError> {
        let timer = Timer::start();
        info!(
            engine = self.engine.name(),
            files = self.scanner.all_files().len(),
            "Execute analysis"
        );

        let java_version = java_language_version(&self.options.java_source_version)?;
        let context = ExecutionContext::new(self.scanner.root(), &self.options.dependencies)?;
        let outcome = {
            let _scope = context.enter();
            self.execute_languages(&context, &java_version)
        };
        if let Err(e) = context.close() {
            error!(error = %e, "Failed to release the execution context");
        }

        let (report, mut timing) = outcome?;
        if self.options.generate_xml {
            self.write_report(&report)?;
        }

        timing.total_duration = timer.elapsed();
        info!(
            violations = report.violations.len(),
            processing_errors = report.processing_errors.len(),
            configuration_errors = report.configuration_errors.len(),
            "Execute analysis done: time={}ms",
            timer.elapsed_millis()
        );

        Ok((report, timing))
    }

    fn execute_languages(
        &self,
        context: &ExecutionContext,
        java_version: &str,
    ) -> Result<(AnalysisReport, ExecutionTiming), BridgeError> {
        let mut report = AnalysisReport::default();
        let mut timing = ExecutionTiming::default();

        for &language in &self.options.languages {
            let synthesizer = RuleSetSynthesizer::new(self.registry, language.key());
            let mut language_report = AnalysisReport::default();

            for scope in Scope::FILE_SCOPES {
                if let Some((pass_report, pass_timing)) =
                    self.execute_pass(language, scope, &synthesizer, context, java_version)?
                {
                    language_report.merge(pass_report);
                    timing.add_pass(pass_timing);
                }
            }

            debug!(
                language = %language,
                violations = language_report.violations.len(),
                "Language completed"
            );
            report.merge(language_report);
        }

        Ok((report, timing))
    }

    fn execute_pass(
        &self,
        language: Language,
        scope: Scope,
        synthesizer: &RuleSetSynthesizer<'_>,
        context: &ExecutionContext,
        java_version: &str,
    ) -> Result<Option<(AnalysisReport, PassTiming)>, BridgeError> {
        let span = span!(Level::INFO, "pass", language = %language, scope = %scope);
        let _guard = span.enter();

        if !self.scanner.has_files(language, scope) {
            debug!("No files to analyze, skipping");
            return Ok(None);
        }

        let ruleset = synthesizer.synthesize(self.rules, language.repository_key(), scope)?;
        if ruleset.is_empty() {
            debug!("No active rules, skipping");
            return Ok(None);
        }

        let ruleset_path = self.write_ruleset(&ruleset)?;
        let timer = Timer::start();
        let request = EngineRequest {
            language,
            scope,
            files: self.scanner.files(language, scope),
            ruleset_path: &ruleset_path,
            rule_count: ruleset.rule_count(),
            context,
            java_source_version: java_version,
        };

        info!(
            files = request.files.len(),
            rules = request.rule_count,
            "Execute {}",
            self.engine.name()
        );
        let report = self.engine.run(&request)?;

        debug!(
            violations = report.violations.len(),
            processing_errors = report.processing_errors.len(),
            configuration_errors = report.configuration_errors.len(),
            "Pass completed"
        );

        let timing = PassTiming {
            language,
            scope,
            rule_count: request.rule_count,
            violation_count: report.violations.len(),
            duration: timer.elapsed(),
        };
        Ok(Some((report, timing)))
    }

    fn write_ruleset(&self, ruleset: &SynthesizedRuleSet) -> Result<PathBuf, BridgeError> {
        let path = self.options.work_dir.join(ruleset.file_name());
        let write_error = |source| ConfigError::RuleSetWrite {
            path: path.display().to_string(),
            source,
        };

        let xml = ruleset.to_xml()?;
        fs::create_dir_all(&self.options.work_dir).map_err(write_error)?;
        fs::write(&path, xml).map_err(write_error)?;
        debug!(path = %path.display(), "Ruleset written");
        Ok(path)
    }

    fn write_report(&self, report: &AnalysisReport) -> Result<(), BridgeError> {
        let path = self.options.work_dir.join(REPORT_FILENAME);
        let write_error = |source| ConfigError::ReportWrite {
            path: path.display().to_string(),
            source,
        };

        let xml = crate::engine::report_xml::render(report).map_err(write_error)?;
        fs::create_dir_all(&self.options.work_dir).map_err(write_error)?;
        fs::write(&path, xml).map_err(write_error)?;
        info!(path = %path.display(), "Report written");
        Ok(())
    }
}
