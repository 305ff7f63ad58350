//! Terminal output formatting with colors

use colored::Colorize;

use super::{AnalysisSummary, ReportRenderer};
use crate::error::BridgeError;
use crate::recorder::Issue;
use crate::rules::Severity;

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, project: &str) -> String {
        format!(
            "\n{} v{}\n\n{} {}\n",
            "rulebridge".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Project:".dimmed(),
            project.white().bold()
        )
    }

    fn format_passes(&self, summary: &AnalysisSummary<'_>) -> String {
        let mut output = String::new();
        if summary.timing.passes.is_empty() {
            output.push_str(&format!("  {}\n", "No analysis pass was needed.".dimmed()));
            return output;
        }

        for pass in &summary.timing.passes {
            output.push_str(&format!(
                "  {} {:<8} {:<5} {} rules, {} violations ({})\n",
                "▸".dimmed(),
                pass.language.to_string().cyan(),
                pass.scope.to_string(),
                pass.rule_count,
                pass.violation_count,
                pass.duration_formatted().dimmed()
            ));
        }
        output
    }

    fn format_issues(&self, issues: &[Issue]) -> String {
        let mut output = format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  ISSUES".bold()
        );

        if issues.is_empty() {
            output.push_str(&format!("  {}\n", "No issues found.".green()));
            return output;
        }

        for severity in Severity::ALL.iter().rev() {
            let matching: Vec<_> = issues.iter().filter(|i| i.severity == *severity).collect();
            if matching.is_empty() {
                continue;
            }

            output.push_str(&format!("{} ({})\n", self.severity_label(*severity), matching.len()));
            for issue in matching {
                output.push_str(&self.format_issue(issue));
            }
            output.push('\n');
        }
        output
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.to_string();
        match severity {
            Severity::Blocker | Severity::Critical => label.red().bold().to_string(),
            Severity::Major => label.yellow().bold().to_string(),
            Severity::Minor | Severity::Info => label.blue().bold().to_string(),
        }
    }

    fn format_issue(&self, issue: &Issue) -> String {
        let lines = if issue.range.start_line == issue.range.end_line {
            format!("{}", issue.range.start_line)
        } else {
            format!("{}-{}", issue.range.start_line, issue.range.end_line)
        };
        format!(
            "  {} [{}] {}\n    {} {}:{}\n",
            "•".dimmed(),
            issue.rule_key.to_string().cyan(),
            issue.message,
            "└─".dimmed(),
            issue.file.dimmed(),
            lines.dimmed()
        )
    }

    fn format_errors(&self, summary: &AnalysisSummary<'_>) -> String {
        let report = summary.report;
        if !report.has_errors() {
            return String::new();
        }

        let mut output = format!("{}\n", "ENGINE ERRORS".red().bold());
        for error in &report.processing_errors {
            output.push_str(&format!(
                "  {} {}: {}\n",
                "•".dimmed(),
                error.file_path.yellow(),
                error.message
            ));
        }
        for error in &report.configuration_errors {
            output.push_str(&format!(
                "  {} [{}] {}\n",
                "•".dimmed(),
                error.rule_name.yellow(),
                error.message
            ));
        }
        output.push('\n');
        output
    }

    fn format_summary(&self, summary: &AnalysisSummary<'_>) -> String {
        format!(
            "{}\n{} {} issues, {} engine errors in {}\n",
            "━".repeat(50).dimmed(),
            "Summary:".bold(),
            summary.issues.len(),
            summary.report.processing_errors.len() + summary.report.configuration_errors.len(),
            summary.timing.total_duration_formatted()
        )
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, summary: &AnalysisSummary<'_>) -> Result<String, BridgeError> {
        let mut output = self.format_header(summary.project);
        output.push_str(&self.format_passes(summary));
        output.push_str(&self.format_issues(summary.issues));
        output.push_str(&self.format_errors(summary));
        output.push_str(&self.format_summary(summary));
        Ok(output)
    }
}
