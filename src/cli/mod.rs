//! # CLI Module
//!
//! This module defines the command-line interface for rulebridge using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Run the engine over the project and report issues |
//! | `ruleset` | Print the ruleset synthesized for a repository and scope |
//! | `scopes` | Classify the rules of rule-definition files |
//! | `import` | Convert an engine ruleset into active-rule configuration |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `-C, --directory <DIR>` - Project directory (defaults to current directory)
//! - `--log-json` - JSON log lines (also `RULEBRIDGE_LOG_JSON`)
//!
//! ## Examples
//!
//! ```bash
//! # Analyze the current project
//! rulebridge analyze
//!
//! # JSON issues for CI
//! rulebridge analyze --format json -o issues.json
//!
//! # Inspect the test-scope ruleset
//! rulebridge ruleset --repository pmd --scope test
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{AnalyzeArgs, ImportArgs, RulesetArgs, ScopesArgs};

/// rulebridge - Scope-aware rulesets and analysis runs for an external static analyzer
#[derive(Parser, Debug)]
#[command(name = "rulebridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "RULEBRIDGE_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the project and report issues
    Analyze(AnalyzeArgs),

    /// Print the synthesized ruleset of a repository
    Ruleset(RulesetArgs),

    /// Print the scope of every rule in rule-definition files
    Scopes(ScopesArgs),

    /// Print active-rule configuration for an engine ruleset
    Import(ImportArgs),
}
