//! Languages the engine is driven for
//!
//! Each language owns a rule repository and a set of file extensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Repository keys searched, in order, when a violation is mapped back to an
/// active rule.
pub const REPOSITORY_KEYS: [&str; 3] = ["pmd", "pmd-kotlin", "pmd-apex"];

/// A language analyzed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Kotlin,
    Apex,
}

impl Language {
    /// Every known language, in execution order
    pub const ALL: [Language; 3] = [Language::Java, Language::Kotlin, Language::Apex];

    /// Language key, also used as the engine language name
    pub fn key(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Apex => "apex",
        }
    }

    /// Key of the rule repository holding this language's rules
    pub fn repository_key(&self) -> &'static str {
        match self {
            Language::Java => REPOSITORY_KEYS[0],
            Language::Kotlin => REPOSITORY_KEYS[1],
            Language::Apex => REPOSITORY_KEYS[2],
        }
    }

    /// File extensions, without the leading dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Java => &["java"],
            Language::Kotlin => &["kt", "kts"],
            Language::Apex => &["cls", "trigger"],
        }
    }

    /// Detect the language of a file from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.extensions().contains(&extension.as_str()))
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
