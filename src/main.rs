//! rulebridge - scope-aware rulesets and analysis runs for an external static analyzer
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rulebridge::cli::commands::{self, Project};
use rulebridge::cli::{exit_codes, Cli, Commands};
use rulebridge::error::{BridgeError, ConfigError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.log_json);

    let result = run(cli);

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match e {
                BridgeError::Config(ConfigError::UnknownLanguage(_)) => exit_codes::INVALID_ARGS,
                _ => exit_codes::ERROR,
            };
            std::process::exit(exit_code);
        }
    }
}

fn run(cli: Cli) -> Result<i32, BridgeError> {
    match cli.command {
        Commands::Scopes(args) => commands::scopes::execute(args),
        Commands::Import(args) => commands::import::execute(args),
        Commands::Analyze(args) => {
            let project = Project::load(cli.directory.as_deref(), cli.config.as_deref())?;
            commands::analyze::execute(args, &project)
        }
        Commands::Ruleset(args) => {
            let project = Project::load(cli.directory.as_deref(), cli.config.as_deref())?;
            commands::ruleset::execute(args, &project)
        }
    }
}

fn setup_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(text_layer)
        .with(json_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
