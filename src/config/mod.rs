//! Configuration module

pub mod loader;

pub use loader::Config;

use serde::{Deserialize, Serialize};

/// Source scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Globs (relative to the project root) marking test sources
    #[serde(default = "default_test_patterns")]
    pub test_patterns: Vec<String>,

    /// Globs of files that are never analyzed
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            test_patterns: default_test_patterns(),
            exclude: default_exclude(),
        }
    }
}

fn default_test_patterns() -> Vec<String> {
    [
        "**/src/test/**",
        "**/src/androidTest/**",
        "**/*Test.java",
        "**/*Tests.java",
        "**/*Test.kt",
        "**/*Test.cls",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_exclude() -> Vec<String> {
    ["**/target/**", "**/build/**", "**/node_modules/**"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// External engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine executable, looked up on PATH unless it is a path
    #[serde(default = "default_command")]
    pub command: String,

    /// Extra arguments appended to every engine invocation
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            extra_args: Vec::new(),
        }
    }
}

fn default_command() -> String {
    "pmd".to_string()
}
