//! Ruleset document model

use super::{is_xpath_class, XPATH_EXPRESSION_PARAM, XPATH_MESSAGE_PARAM, XPATH_RULE_CLASS};
use crate::error::ConfigError;

/// A ruleset document: a named list of rule entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Ruleset name, written as the root `name` attribute
    pub name: String,
    /// Optional `<description>` text
    pub description: Option<String>,
    /// Rule entries in document order
    pub rules: Vec<RuleSetRule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            rules: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, rule: RuleSetRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One `<rule>` entry.
///
/// A reference rule only carries `reference`; an expression rule is fully
/// specified by `class`, `name`, `message` and `language` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSetRule {
    pub reference: Option<String>,
    pub class: Option<String>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub priority: Option<u8>,
    pub properties: Vec<RuleProperty>,
}

impl RuleSetRule {
    /// A rule entry referencing a rule known to the engine
    pub fn reference(reference: impl Into<String>, priority: Option<u8>) -> Self {
        Self {
            reference: Some(reference.into()),
            priority,
            ..Self::default()
        }
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut RuleProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn remove_property(&mut self, name: &str) -> Option<RuleProperty> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index))
    }

    /// Check if this entry is, or references, an expression rule
    pub fn is_expression_rule(&self) -> bool {
        self.reference.as_deref().is_some_and(is_xpath_class)
            || self.class.as_deref().is_some_and(is_xpath_class)
    }

    /// Turn a reference to the expression rule class into a fully specified
    /// expression rule named `rule_key`.
    ///
    /// The `message` property becomes the rule message and the `xpath`
    /// property is kept as a CDATA body. Entries that do not reference the
    /// expression rule class are left untouched.
    pub fn process_expression(&mut self, rule_key: &str, language: &str) -> Result<(), ConfigError> {
        if !self.reference.as_deref().is_some_and(is_xpath_class) {
            return Ok(());
        }

        let message = self
            .remove_property(XPATH_MESSAGE_PARAM)
            .ok_or_else(|| missing(rule_key, XPATH_MESSAGE_PARAM))?;
        let expression = self
            .property_mut(XPATH_EXPRESSION_PARAM)
            .ok_or_else(|| missing(rule_key, XPATH_EXPRESSION_PARAM))?;
        expression.cdata = true;

        self.reference = None;
        self.message = Some(message.value);
        self.class = Some(XPATH_RULE_CLASS.to_string());
        self.language = Some(language.to_string());
        self.name = Some(rule_key.to_string());
        Ok(())
    }
}

fn missing(rule_key: &str, property: &'static str) -> ConfigError {
    ConfigError::MissingExpressionProperty {
        rule: rule_key.to_string(),
        property,
    }
}

/// A `<property>` of a rule entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleProperty {
    pub name: String,
    pub value: String,
    /// Written as a CDATA `<value>` child instead of a `value` attribute
    pub cdata: bool,
}

impl RuleProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            cdata: false,
        }
    }

    pub fn cdata(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            cdata: true,
            ..Self::new(name, value)
        }
    }

    /// Empty or whitespace-only values are never written
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xpath_reference() -> RuleSetRule {
        RuleSetRule {
            reference: Some(XPATH_RULE_CLASS.to_string()),
            priority: Some(3),
            properties: vec![
                RuleProperty::new("xpath", "//ImportDeclaration[@PackageName='java.util']"),
                RuleProperty::new("message", "Avoid java.util"),
            ],
            ..RuleSetRule::default()
        }
    }

    #[test]
    fn test_process_expression() {
        let mut rule = xpath_reference();
        rule.process_expression("NoUtilImports", "java").unwrap();

        assert_eq!(rule.reference, None);
        assert_eq!(rule.class.as_deref(), Some(XPATH_RULE_CLASS));
        assert_eq!(rule.name.as_deref(), Some("NoUtilImports"));
        assert_eq!(rule.message.as_deref(), Some("Avoid java.util"));
        assert_eq!(rule.language.as_deref(), Some("java"));
        assert_eq!(rule.properties.len(), 1);
        assert!(rule.properties[0].cdata);
        assert!(rule.is_expression_rule());
    }

    #[test]
    fn test_process_expression_requires_message() {
        let mut rule = xpath_reference();
        rule.remove_property("message");
        let err = rule.process_expression("NoUtilImports", "java").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingExpressionProperty { property: "message", .. }
        ));
    }

    #[test]
    fn test_process_expression_requires_expression() {
        let mut rule = xpath_reference();
        rule.remove_property("xpath");
        let err = rule.process_expression("NoUtilImports", "java").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingExpressionProperty { property: "xpath", .. }
        ));
    }

    #[test]
    fn test_legacy_class_is_expression() {
        let mut rule = RuleSetRule::reference(crate::ruleset::LEGACY_XPATH_RULE_CLASS, None);
        rule.properties.push(RuleProperty::new("xpath", "//Block"));
        rule.properties.push(RuleProperty::new("message", "m"));
        rule.process_expression("Legacy", "java").unwrap();
        assert_eq!(rule.class.as_deref(), Some(XPATH_RULE_CLASS));
    }

    #[test]
    fn test_reference_rule_is_untouched() {
        let mut rule = RuleSetRule::reference("category/java/design.xml/GodClass", Some(2));
        rule.process_expression("GodClass", "java").unwrap();
        assert_eq!(
            rule,
            RuleSetRule::reference("category/java/design.xml/GodClass", Some(2))
        );
    }

    #[test]
    fn test_blank_property() {
        assert!(RuleProperty::new("p", "").is_blank());
        assert!(RuleProperty::new("p", "  \t").is_blank());
        assert!(!RuleProperty::new("p", "0").is_blank());
    }
}
