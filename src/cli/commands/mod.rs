//! CLI commands module

pub mod analyze;
pub mod import;
pub mod ruleset;
pub mod scopes;

use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::BridgeError;
use crate::languages::Language;
use crate::rules::{Scope, ScopeRegistry};

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the ruleset command
#[derive(Args, Debug)]
pub struct RulesetArgs {
    /// Repository whose active rules are synthesized (pmd, pmd-kotlin, pmd-apex)
    #[arg(short, long, value_name = "KEY")]
    pub repository: String,

    /// Scope to synthesize (main, test, all)
    #[arg(short, long, default_value = "all", value_parser = parse_scope)]
    pub scope: Scope,

    /// Language stamped on expression rules (defaults to the repository's)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the scopes command
#[derive(Args, Debug)]
pub struct ScopesArgs {
    /// Rule-definition XML files
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Engine ruleset XML file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Repository the imported rules belong to
    #[arg(short, long, default_value = "pmd", value_name = "KEY")]
    pub repository: String,
}

/// Output format for analyze command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

fn parse_scope(s: &str) -> Result<Scope, String> {
    Scope::from_string(s).ok_or_else(|| format!("unknown scope '{}' (expected main, test or all)", s))
}

/// Project root and configuration, as selected by the global options
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn load(directory: Option<&Path>, config: Option<&Path>) -> Result<Self, BridgeError> {
        let root = std::fs::canonicalize(directory.unwrap_or(Path::new(".")))?;
        let config = match config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::load_or_default(&root)?,
        };
        debug!(root = %root.display(), "Project loaded");
        Ok(Self { root, config })
    }

    /// Scope registry fed with every configured definition file and index
    pub fn registry(&self) -> ScopeRegistry {
        let registry = ScopeRegistry::new();
        for path in &self.config.rule_definitions {
            registry.load_path(&self.config.resolve(&self.root, path));
        }
        for index in &self.config.rule_indexes {
            registry.load_index(&self.config.resolve(&self.root, index));
        }
        info!(rules = registry.len(), "Scope registry loaded");
        registry
    }
}

/// Write command output to a file, or to stdout
fn emit(output: Option<&Path>, content: &str) -> Result<(), BridgeError> {
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => println!("{}", content),
    }
    Ok(())
}
