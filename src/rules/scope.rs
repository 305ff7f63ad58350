//! # Rule scopes
//!
//! Every rule applies to main sources, test sources, or both. The scope is
//! derived from the rule's tags, falling back to a heuristic on its name.
//!
//! ```rust
//! use rulebridge::rules::scope::{classify, Scope};
//!
//! assert_eq!(classify("Avoid System.out", ["main-sources"]), Scope::Main);
//! assert_eq!(classify("JUnit assertions should include a message", [] as [&str; 0]), Scope::Test);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag marking a rule as applicable to main sources.
pub const MAIN_SOURCES_TAG: &str = "main-sources";

/// Tag marking a rule as applicable to test sources.
pub const TESTS_TAG: &str = "tests";

/// Analysis scope of a rule or of a set of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Production sources only
    Main,
    /// Test sources only
    Test,
    /// Both; the default for anything not classified otherwise
    #[default]
    All,
}

impl Scope {
    /// The scopes a file can actually belong to.
    pub const FILE_SCOPES: [Scope; 2] = [Scope::Main, Scope::Test];

    /// Lowercase label, used for artifact names and CLI values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Main => "main",
            Scope::Test => "test",
            Scope::All => "all",
        }
    }

    /// Parse a scope label (case-insensitive).
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "main" => Some(Self::Main),
            "test" => Some(Self::Test),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Whether a rule of this scope must run when analyzing `target`.
    pub fn applies_to(&self, target: Scope) -> bool {
        target == Scope::All || *self == Scope::All || *self == target
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Main => "MAIN",
            Scope::Test => "TEST",
            Scope::All => "ALL",
        })
    }
}

/// Determine the scope of a rule from its display name and tags.
///
/// Explicit scope tags win over the name: both tags mean [`Scope::All`],
/// a single one picks that scope. Without a recognized tag, a name that
/// mentions "test" or "junit" (any case) yields [`Scope::Test`].
pub fn classify<I, S>(name: &str, tags: I) -> Scope
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut has_main = false;
    let mut has_test = false;

    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.eq_ignore_ascii_case(MAIN_SOURCES_TAG) {
            has_main = true;
        } else if tag.eq_ignore_ascii_case(TESTS_TAG) {
            has_test = true;
        }
    }

    match (has_main, has_test) {
        (true, true) => Scope::All,
        (true, false) => Scope::Main,
        (false, true) => Scope::Test,
        (false, false) => classify_by_name(name),
    }
}

fn classify_by_name(name: &str) -> Scope {
    let lower = name.to_lowercase();
    if lower.contains("test") || lower.contains("junit") {
        Scope::Test
    } else {
        Scope::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TAGS: [&str; 0] = [];

    #[test]
    fn test_no_tags_plain_name_is_all() {
        assert_eq!(classify("Rule 00", NO_TAGS), Scope::All);
    }

    #[test]
    fn test_name_heuristic() {
        assert_eq!(classify("Test rule 01", NO_TAGS), Scope::Test);
        assert_eq!(classify("Rule for junit", NO_TAGS), Scope::Test);
        assert_eq!(classify("JUnitStaticSuite", NO_TAGS), Scope::Test);
        assert_eq!(classify("AttestationCheck", NO_TAGS), Scope::Test);
    }

    #[test]
    fn test_single_tags() {
        assert_eq!(classify("Rule 02", ["tests"]), Scope::Test);
        assert_eq!(classify("Main rule 03", ["main-sources"]), Scope::Main);
    }

    #[test]
    fn test_main_tag_overrides_test_name() {
        assert_eq!(
            classify("Rule Not Test But Main 06", ["main-sources"]),
            Scope::Main
        );
    }

    #[test]
    fn test_conflicting_tags_are_all_regardless_of_name() {
        assert_eq!(classify("Rule 04", ["main-sources", "tests"]), Scope::All);
        assert_eq!(
            classify("Rule Not Test But All 07", ["tests", "main-sources"]),
            Scope::All
        );
    }

    #[test]
    fn test_near_miss_tag_falls_back_to_name() {
        assert_eq!(classify("Rule 05", ["test"]), Scope::All);
        assert_eq!(classify("Rule 05 test", ["test"]), Scope::Test);
        assert_eq!(classify("Rule", ["main-source", "performance"]), Scope::All);
    }

    #[test]
    fn test_tags_match_case_insensitively() {
        assert_eq!(classify("x", ["MAIN-SOURCES"]), Scope::Main);
        assert_eq!(classify("x", ["Tests"]), Scope::Test);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let tags = vec!["performance".to_string(), "tests".to_string()];
        assert_eq!(classify("Some Rule", &tags), classify("Some Rule", &tags));
    }

    #[test]
    fn test_scope_applies_to() {
        assert!(Scope::All.applies_to(Scope::Main));
        assert!(Scope::Main.applies_to(Scope::Main));
        assert!(!Scope::Main.applies_to(Scope::Test));
        assert!(!Scope::Test.applies_to(Scope::Main));
        assert!(Scope::Test.applies_to(Scope::All));
    }

    #[test]
    fn test_scope_from_string() {
        assert_eq!(Scope::from_string("MAIN"), Some(Scope::Main));
        assert_eq!(Scope::from_string(" test "), Some(Scope::Test));
        assert_eq!(Scope::from_string("all"), Some(Scope::All));
        assert_eq!(Scope::from_string("tests"), None);
    }
}
