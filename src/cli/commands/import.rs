//! Import command - Convert an engine ruleset into active-rule configuration

use serde::Serialize;
use std::fs;

use super::ImportArgs;
use crate::cli::exit_codes;
use crate::error::{BridgeError, ConfigError};
use crate::rules::{ActiveRule, ActiveRules};
use crate::ruleset::reader;

#[derive(Serialize)]
struct ImportedRules {
    active_rules: Vec<ActiveRule>,
}

pub fn execute(args: ImportArgs) -> Result<i32, BridgeError> {
    let content = fs::read_to_string(&args.file).map_err(|e| ConfigError::FileRead {
        path: args.file.display().to_string(),
        source: e,
    })?;
    let ruleset = reader::parse(&content)?;
    let rules = ActiveRules::from_ruleset(&args.repository, &ruleset);

    let imported = ImportedRules {
        active_rules: rules.into_vec(),
    };
    print!("{}", toml::to_string_pretty(&imported)?);
    Ok(exit_codes::SUCCESS)
}
