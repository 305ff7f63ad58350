//! Scopes command - Classify the rules of rule-definition files

use std::fs;
use tracing::warn;

use super::ScopesArgs;
use crate::cli::exit_codes;
use crate::error::BridgeError;
use crate::rules::registry::parse_definitions;

pub fn execute(args: ScopesArgs) -> Result<i32, BridgeError> {
    let mut exit_code = exit_codes::SUCCESS;

    for path in &args.files {
        let identity = path.display().to_string();
        let descriptors = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|xml| parse_definitions(&identity, &xml).map_err(|e| e.to_string()));

        match descriptors {
            Ok(descriptors) => {
                for descriptor in descriptors {
                    println!("{}\t{}", descriptor.key, descriptor.scope());
                }
            }
            Err(e) => {
                warn!(file = %identity, error = %e, "Skipping rule definitions");
                eprintln!("Error: {}: {}", identity, e);
                exit_code = exit_codes::INVALID_ARGS;
            }
        }
    }

    Ok(exit_code)
}
