//! JSON output formatting

use serde::Serialize;

use super::{AnalysisSummary, ReportRenderer};
use crate::engine::{ConfigurationError, ProcessingError};
use crate::error::BridgeError;
use crate::languages::Language;
use crate::recorder::Issue;
use crate::rules::Scope;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    version: &'static str,
    project: &'a str,
    issue_count: usize,
    issues: &'a [Issue],
    processing_errors: &'a [ProcessingError],
    configuration_errors: &'a [ConfigurationError],
    passes: Vec<PassSummary>,
    duration_ms: u128,
}

#[derive(Serialize)]
struct PassSummary {
    language: Language,
    scope: Scope,
    rule_count: usize,
    violation_count: usize,
    duration_ms: u128,
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, summary: &AnalysisSummary<'_>) -> Result<String, BridgeError> {
        let output = AnalysisOutput {
            version: env!("CARGO_PKG_VERSION"),
            project: summary.project,
            issue_count: summary.issues.len(),
            issues: summary.issues,
            processing_errors: &summary.report.processing_errors,
            configuration_errors: &summary.report.configuration_errors,
            passes: summary
                .timing
                .passes
                .iter()
                .map(|p| PassSummary {
                    language: p.language,
                    scope: p.scope,
                    rule_count: p.rule_count,
                    violation_count: p.violation_count,
                    duration_ms: p.duration.as_millis(),
                })
                .collect(),
            duration_ms: summary.timing.total_duration.as_millis(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}
