//! Engine ruleset documents
//!
//! - [`model`] - in-memory ruleset document
//! - [`writer`] - XML serialization of a ruleset
//! - [`reader`] - parsing of existing ruleset documents
//! - [`synthesizer`] - builds a scoped ruleset from active rules

pub mod model;
pub mod reader;
pub mod synthesizer;
pub mod writer;

pub use model::{RuleProperty, RuleSet, RuleSetRule};
pub use synthesizer::{RuleSetSynthesizer, SynthesizedRuleSet};

/// Namespace of ruleset documents
pub const RULESET_NAMESPACE: &str = "http://pmd.sourceforge.net/ruleset/2.0.0";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Schema location declared on the ruleset root
pub const SCHEMA_LOCATION: &str =
    "http://pmd.sourceforge.net/ruleset/2.0.0 http://pmd.sourceforge.net/ruleset_2_0_0.xsd";

/// Class implementing expression (XPath) rules
pub const XPATH_RULE_CLASS: &str = "net.sourceforge.pmd.lang.rule.xpath.XPathRule";

/// Class name used for expression rules by older engine releases
pub const LEGACY_XPATH_RULE_CLASS: &str = "net.sourceforge.pmd.lang.rule.XPathRule";

/// Parameter holding the expression of an expression rule
pub const XPATH_EXPRESSION_PARAM: &str = "xpath";

/// Parameter holding the message of an expression rule
pub const XPATH_MESSAGE_PARAM: &str = "message";

/// Check if a reference or class names the expression rule implementation
pub fn is_xpath_class(name: &str) -> bool {
    name == XPATH_RULE_CLASS || name == LEGACY_XPATH_RULE_CLASS
}
