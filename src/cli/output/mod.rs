//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::engine::AnalysisReport;
use crate::error::BridgeError;
use crate::recorder::Issue;
use crate::utils::timing::ExecutionTiming;

/// Everything an `analyze` run produced
#[derive(Debug)]
pub struct AnalysisSummary<'a> {
    pub project: &'a str,
    pub issues: &'a [Issue],
    pub report: &'a AnalysisReport,
    pub timing: &'a ExecutionTiming,
}

/// Trait for rendering analysis output
pub trait ReportRenderer {
    fn render_report(&self, summary: &AnalysisSummary<'_>) -> Result<String, BridgeError>;
}
