//! Ruleset synthesis from the active rule selection
//!
//! One ruleset is built per repository and scope. A rule takes part when its
//! scope, either set on the active rule or looked up in the
//! [`ScopeRegistry`], applies to the requested scope.

use tracing::debug;

use super::model::{RuleProperty, RuleSet, RuleSetRule};
use super::writer;
use crate::error::{ConfigError, RuleSetError};
use crate::rules::{ActiveRule, ActiveRules, Scope, ScopeRegistry};

/// A ruleset built for one repository and scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedRuleSet {
    pub repository: String,
    pub scope: Scope,
    pub ruleset: RuleSet,
}

impl SynthesizedRuleSet {
    /// Number of rules in the ruleset
    pub fn rule_count(&self) -> usize {
        self.ruleset.len()
    }

    /// An empty ruleset means there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.ruleset.is_empty()
    }

    /// Name of the file the ruleset is written to: `<repository>-<scope>.xml`,
    /// or `<repository>.xml` for [`Scope::All`].
    pub fn file_name(&self) -> String {
        match self.scope {
            Scope::All => format!("{}.xml", self.repository),
            scope => format!("{}-{}.xml", self.repository, scope.as_str()),
        }
    }

    /// Serialized ruleset document
    pub fn to_xml(&self) -> Result<String, RuleSetError> {
        writer::to_xml(&self.ruleset)
    }
}

/// Builds engine rulesets out of active rules
#[derive(Debug, Clone, Copy)]
pub struct RuleSetSynthesizer<'a> {
    registry: &'a ScopeRegistry,
    language: &'a str,
}

impl<'a> RuleSetSynthesizer<'a> {
    /// `language` is the engine language key stamped on expression rules
    pub fn new(registry: &'a ScopeRegistry, language: &'a str) -> Self {
        Self { registry, language }
    }

    /// Resolved scope of an active rule
    pub fn scope_of(&self, rule: &ActiveRule) -> Scope {
        rule.scope
            .unwrap_or_else(|| self.registry.scope_of(&rule.key))
    }

    /// Build the ruleset of `repository` restricted to `scope`.
    ///
    /// Fails when an expression rule lacks its `message` or `xpath` parameter.
    pub fn synthesize(
        &self,
        rules: &ActiveRules,
        repository: &str,
        scope: Scope,
    ) -> Result<SynthesizedRuleSet, ConfigError> {
        let mut ruleset = RuleSet::new(
            repository,
            Some(format!("Sonar Profile: {} ({})", repository, scope)),
        );

        for rule in rules.find_by_repository(repository) {
            let rule_scope = self.scope_of(rule);
            if !rule_scope.applies_to(scope) {
                debug!(rule = %rule.rule_key(), rule_scope = %rule_scope, scope = %scope, "Rule not applicable to scope");
                continue;
            }
            ruleset.add_rule(self.rule_entry(rule)?);
        }

        debug!(
            repository,
            scope = %scope,
            rules = ruleset.len(),
            "Synthesized ruleset"
        );

        Ok(SynthesizedRuleSet {
            repository: repository.to_string(),
            scope,
            ruleset,
        })
    }

    fn rule_entry(&self, rule: &ActiveRule) -> Result<RuleSetRule, ConfigError> {
        let mut entry = RuleSetRule::reference(rule.engine_ref(), Some(rule.severity.priority()));
        entry.properties = rule
            .params
            .iter()
            .map(|(name, value)| RuleProperty::new(name.as_str(), value.as_str()))
            .filter(|property| !property.is_blank())
            .collect();
        entry.process_expression(&rule.key, self.language)?;
        Ok(entry)
    }
}
