//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{EngineConfig, ScannerConfig};
use crate::error::{BridgeError, ConfigError};
use crate::languages::Language;
use crate::rules::{ActiveRule, ActiveRules};

/// Name of the configuration file looked up in the project root
pub const CONFIG_FILENAME: &str = ".rulebridge.toml";

/// Default Java source version handed to the engine
pub const DEFAULT_JAVA_SOURCE_VERSION: &str = "11";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory receiving rulesets and the optional report
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Write the combined engine report to `pmd-result.xml`
    #[serde(default)]
    pub generate_xml: bool,

    /// Languages to analyze
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,

    /// Classpath entries made available to the engine
    #[serde(default)]
    pub dependencies: Vec<PathBuf>,

    /// Rule-definition XML files feeding the scope registry
    #[serde(default)]
    pub rule_definitions: Vec<PathBuf>,

    /// Text files listing rule-definition files, one per line
    #[serde(default)]
    pub rule_indexes: Vec<PathBuf>,

    /// Java source version of the analyzed code
    #[serde(default = "default_java_source_version")]
    pub java_source_version: String,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Rules enabled for analysis
    #[serde(default)]
    pub active_rules: Vec<ActiveRule>,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".rulebridge")
}

fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

fn default_java_source_version() -> String {
    DEFAULT_JAVA_SOURCE_VERSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            generate_xml: false,
            languages: default_languages(),
            dependencies: Vec::new(),
            rule_definitions: Vec::new(),
            rule_indexes: Vec::new(),
            java_source_version: default_java_source_version(),
            scanner: ScannerConfig::default(),
            engine: EngineConfig::default(),
            active_rules: Vec::new(),
        }
    }
}

impl Config {
    /// Load `.rulebridge.toml` from the project root, or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self, BridgeError> {
        let config_path = root.join(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, BridgeError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, BridgeError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }

    /// The active rule selection
    pub fn active_rules(&self) -> ActiveRules {
        ActiveRules::new(self.active_rules.clone())
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Working directory for engine artifacts
    pub fn work_dir(&self, root: &Path) -> PathBuf {
        self.resolve(root, &self.work_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Scope, Severity};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.work_dir, PathBuf::from(".rulebridge"));
        assert!(!config.generate_xml);
        assert_eq!(config.languages, Language::ALL.to_vec());
        assert_eq!(config.java_source_version, "11");
        assert_eq!(config.engine.command, "pmd");
        assert!(config.active_rules.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"
generate_xml = true
languages = ["java", "kotlin"]
dependencies = ["lib/guava.jar"]
rule_definitions = ["rules/pmd.xml"]
java_source_version = "17"

[scanner]
test_patterns = ["**/test/**"]

[engine]
command = "/opt/pmd/bin/pmd"
extra_args = ["--threads", "2"]

[[active_rules]]
repository = "pmd"
key = "AvoidPrintStackTrace"
internal_key = "category/java/bestpractices.xml/AvoidPrintStackTrace"
severity = "critical"

[[active_rules]]
repository = "pmd"
key = "UnusedPrivateField"
scope = "main"
params = { reportLevel = "2" }
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert!(config.generate_xml);
        assert_eq!(config.languages, vec![Language::Java, Language::Kotlin]);
        assert_eq!(config.dependencies, vec![PathBuf::from("lib/guava.jar")]);
        assert_eq!(config.java_source_version, "17");
        assert_eq!(config.scanner.test_patterns, vec!["**/test/**".to_string()]);
        assert!(!config.scanner.exclude.is_empty());
        assert_eq!(config.engine.extra_args.len(), 2);

        let rules = config.active_rules();
        assert_eq!(rules.len(), 2);
        let first = rules.find("pmd", "AvoidPrintStackTrace").unwrap();
        assert_eq!(first.severity, Severity::Critical);
        let second = rules.find("pmd", "UnusedPrivateField").unwrap();
        assert_eq!(second.severity, Severity::Major);
        assert_eq!(second.scope, Some(Scope::Main));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert!(config.active_rules.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from_file(Path::new("/nonexistent/.rulebridge.toml")).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ConfigError::FileRead { .. })));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "languages = [\"cobol\"]").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_toml_roundtrip_keeps_active_rules() {
        let mut config = Config::default();
        config.active_rules.push(
            ActiveRule::new("pmd-apex", "ApexCRUDViolation").with_severity(Severity::Blocker),
        );
        let reparsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed.active_rules, config.active_rules);
    }

    #[test]
    fn test_resolve_paths() {
        let config = Config::default();
        let root = Path::new("/project");
        assert_eq!(config.work_dir(root), PathBuf::from("/project/.rulebridge"));
        assert_eq!(
            config.resolve(root, Path::new("/abs/rules.xml")),
            PathBuf::from("/abs/rules.xml")
        );
    }
}
