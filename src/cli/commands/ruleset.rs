//! Ruleset command - Print the ruleset synthesized for a repository

use tracing::info;

use super::{emit, Project, RulesetArgs};
use crate::cli::exit_codes;
use crate::error::BridgeError;
use crate::languages::Language;
use crate::ruleset::RuleSetSynthesizer;

pub fn execute(args: RulesetArgs, project: &Project) -> Result<i32, BridgeError> {
    let registry = project.registry();
    let rules = project.config.active_rules();

    let language = args.language.unwrap_or_else(|| {
        Language::ALL
            .into_iter()
            .find(|language| language.repository_key() == args.repository)
            .unwrap_or(Language::Java)
    });

    let synthesized = RuleSetSynthesizer::new(&registry, language.key()).synthesize(
        &rules,
        &args.repository,
        args.scope,
    )?;
    info!(
        repository = %args.repository,
        scope = %args.scope,
        rules = synthesized.rule_count(),
        "Ruleset synthesized"
    );

    emit(args.output.as_deref(), &synthesized.to_xml()?)?;
    Ok(exit_codes::SUCCESS)
}
