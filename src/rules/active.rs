//! Active rule selection
//!
//! An [`ActiveRule`] is a rule enabled for an analysis run together with its
//! severity and parameter overrides. The same shape is used for the
//! `[[active_rules]]` entries of the configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::priority::Severity;
use super::scope::Scope;
use crate::ruleset::model::{RuleSet, RuleSetRule};
use crate::ruleset::{XPATH_EXPRESSION_PARAM, XPATH_MESSAGE_PARAM, XPATH_RULE_CLASS};

/// Fully qualified rule identity: repository plus rule key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKey {
    pub repository: String,
    pub rule: String,
}

impl RuleKey {
    pub fn new(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// A rule enabled for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRule {
    /// Repository (rule source) the rule belongs to, e.g. `pmd`
    pub repository: String,

    /// Rule key within the repository; also the name the engine reports
    pub key: String,

    /// Engine reference of the rule, e.g. `category/java/bestpractices.xml/AvoidPrintStackTrace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_key: Option<String>,

    /// Severity chosen for the rule
    #[serde(default)]
    pub severity: Severity,

    /// Explicit scope, overriding the one known to the scope registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,

    /// Parameter overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl ActiveRule {
    pub fn new(repository: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            key: key.into(),
            internal_key: None,
            severity: Severity::default(),
            scope: None,
            params: BTreeMap::new(),
        }
    }

    pub fn with_internal_key(mut self, internal_key: impl Into<String>) -> Self {
        self.internal_key = Some(internal_key.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Fully qualified key of this rule
    pub fn rule_key(&self) -> RuleKey {
        RuleKey::new(&self.repository, &self.key)
    }

    /// Reference handed to the engine; the rule key when none is configured.
    pub fn engine_ref(&self) -> &str {
        self.internal_key.as_deref().unwrap_or(&self.key)
    }
}

/// Ordered collection of active rules across repositories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveRules {
    rules: Vec<ActiveRule>,
}

impl ActiveRules {
    pub fn new(rules: Vec<ActiveRule>) -> Self {
        Self { rules }
    }

    /// Rules of one repository, in selection order
    pub fn find_by_repository<'a>(
        &'a self,
        repository: &'a str,
    ) -> impl Iterator<Item = &'a ActiveRule> + 'a {
        self.rules.iter().filter(move |r| r.repository == repository)
    }

    /// Look up a rule by repository and key
    pub fn find(&self, repository: &str, key: &str) -> Option<&ActiveRule> {
        self.rules
            .iter()
            .find(|r| r.repository == repository && r.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_vec(self) -> Vec<ActiveRule> {
        self.rules
    }

    /// Convert an engine ruleset into active rules of `repository`.
    ///
    /// Reference rules are keyed by the last path segment of their reference.
    /// Expression rules are keyed by their name and carry their message and
    /// expression back as `message` and `xpath` parameters.
    pub fn from_ruleset(repository: &str, ruleset: &RuleSet) -> Self {
        let rules = ruleset
            .rules
            .iter()
            .filter_map(|rule| active_rule_from(repository, rule))
            .collect();
        Self { rules }
    }
}

impl FromIterator<ActiveRule> for ActiveRules {
    fn from_iter<T: IntoIterator<Item = ActiveRule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn active_rule_from(repository: &str, rule: &RuleSetRule) -> Option<ActiveRule> {
    let severity = rule
        .priority
        .and_then(|p| Severity::from_priority(i64::from(p)))
        .unwrap_or_default();

    let mut active = if rule.is_expression_rule() {
        let mut active = ActiveRule::new(repository, rule.name.clone()?)
            .with_internal_key(XPATH_RULE_CLASS);
        if let Some(message) = &rule.message {
            active = active.with_param(XPATH_MESSAGE_PARAM, message.clone());
        }
        active
    } else {
        let reference = rule.reference.as_deref()?;
        let key = reference.rsplit('/').next().unwrap_or(reference);
        if key.is_empty() {
            return None;
        }
        ActiveRule::new(repository, key).with_internal_key(reference)
    };

    active.severity = severity;
    for property in &rule.properties {
        active
            .params
            .insert(property.name.clone(), property.value.clone());
    }
    if rule.is_expression_rule() && !active.params.contains_key(XPATH_EXPRESSION_PARAM) {
        return None;
    }
    Some(active)
}
