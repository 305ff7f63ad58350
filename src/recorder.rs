//! Turning engine violations into issues
//!
//! A violation becomes an [`Issue`] only when its file belongs to the scanned
//! project and its rule is active. Anything else is dropped quietly: a rule
//! disabled between execution and recording, or an engine-internal rule, is
//! expected.

use serde::Serialize;
use tracing::debug;

use crate::engine::{AnalysisReport, Violation};
use crate::languages::REPOSITORY_KEYS;
use crate::location::{normalize, NormalizedRange};
use crate::rules::{ActiveRules, RuleKey, Severity};
use crate::scanner::Scanner;

/// A reportable finding on a project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub rule_key: RuleKey,
    /// Path relative to the project root
    pub file: String,
    pub range: NormalizedRange,
    pub message: String,
    pub severity: Severity,
}

/// Maps violations to issues against the scanned files and active rules
#[derive(Debug, Clone, Copy)]
pub struct ViolationRecorder<'a> {
    scanner: &'a Scanner,
    rules: &'a ActiveRules,
}

impl<'a> ViolationRecorder<'a> {
    pub fn new(scanner: &'a Scanner, rules: &'a ActiveRules) -> Self {
        Self { scanner, rules }
    }

    /// Issue for one violation, if its file and rule are known
    pub fn record(&self, violation: &Violation) -> Option<Issue> {
        let Some(file) = self.scanner.find(&violation.file_path) else {
            debug!(file = %violation.file_path.display(), "Violation on unknown file dropped");
            return None;
        };

        let Some(rule) = REPOSITORY_KEYS
            .iter()
            .find_map(|repository| self.rules.find(repository, &violation.rule_name))
        else {
            debug!(rule = %violation.rule_name, "Violation of inactive rule dropped");
            return None;
        };

        Some(Issue {
            rule_key: rule.rule_key(),
            file: file.relative_path.clone(),
            range: normalize(violation.begin_line, violation.end_line),
            message: violation.description.clone(),
            severity: rule.severity,
        })
    }

    /// Issues for every violation of a report, in report order
    pub fn record_all(&self, report: &AnalysisReport) -> Vec<Issue> {
        report
            .violations
            .iter()
            .filter_map(|violation| self.record(violation))
            .collect()
    }
}
