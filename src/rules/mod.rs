//! Rules module - Rule scopes, the scope registry and active rule selection

pub mod active;
pub mod priority;
pub mod registry;
pub mod scope;

pub use active::{ActiveRule, ActiveRules, RuleKey};
pub use priority::Severity;
pub use registry::{RuleDescriptor, ScopeRegistry};
pub use scope::{classify, Scope};
