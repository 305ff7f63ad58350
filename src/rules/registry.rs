//! Rule scope registry
//!
//! Streams rule-definition XML resources and remembers the [`Scope`] of every
//! rule key it sees. Unknown keys resolve to [`Scope::All`].
//!
//! Accepted resource shape (namespaces and the XML declaration are optional):
//!
//! ```xml
//! <rules>
//!   <rule key="LegacyKey"/>
//!   <rule>
//!     <key>AvoidPrintStackTrace</key>
//!     <name>Avoid printStackTrace()</name>
//!     <tag>main-sources</tag>
//!     <description><![CDATA[ ... ]]></description>
//!   </rule>
//! </rules>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

use super::scope::{classify, Scope};
use crate::error::DefinitionError;
use crate::utils::xml::{self, XmlError};

const RULE_ELEMENT: &str = "rule";

/// A rule as declared in a rule-definition resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Rule key, unique within a repository
    pub key: String,
    /// Display name or title (empty when absent)
    pub name: String,
    /// Declared tags
    pub tags: BTreeSet<String>,
}

impl RuleDescriptor {
    /// Scope of this rule, derived from its name and tags.
    pub fn scope(&self) -> Scope {
        classify(&self.name, &self.tags)
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    scopes: HashMap<String, Scope>,
    loaded: HashSet<String>,
}

/// Mapping from rule key to analysis scope.
///
/// Loads are serialized behind a write lock; lookups take a shared lock, so
/// once warm-up is done readers never contend with each other.
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    state: RwLock<RegistryState>,
}

impl ScopeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope of `rule_key`, or [`Scope::All`] when the key is unknown.
    pub fn scope_of(&self, rule_key: &str) -> Scope {
        self.read()
            .scopes
            .get(rule_key)
            .copied()
            .unwrap_or(Scope::All)
    }

    /// Number of rule keys known to the registry
    pub fn len(&self) -> usize {
        self.read().scopes.len()
    }

    /// Check if no rule has been registered
    pub fn is_empty(&self) -> bool {
        self.read().scopes.is_empty()
    }

    /// Check whether a resource identity has already been loaded
    pub fn is_loaded(&self, identity: &str) -> bool {
        self.read().loaded.contains(identity)
    }

    /// Load a rule-definition file.
    ///
    /// The canonical path is the resource identity: a file already loaded is
    /// skipped. A file that cannot be read or parsed contributes no rules.
    /// Returns the number of rules registered from this call.
    pub fn load_path(&self, path: &Path) -> usize {
        let identity = fs::canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();

        let mut state = self.write();
        if !state.loaded.insert(identity.clone()) {
            debug!(resource = %identity, "Rule scopes already loaded, skipping");
            return 0;
        }

        info!(resource = %identity, "Loading rule scopes");
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                let err = DefinitionError::Read {
                    path: identity,
                    source,
                };
                warn!(error = %err, "Rule definitions contribute no scopes");
                return 0;
            }
        };

        Self::register(&mut state, &identity, &content)
    }

    /// Load rule definitions from an in-memory document under `identity`.
    pub fn load_str(&self, identity: &str, xml: &str) -> usize {
        let mut state = self.write();
        if !state.loaded.insert(identity.to_string()) {
            debug!(resource = identity, "Rule scopes already loaded, skipping");
            return 0;
        }

        info!(resource = identity, "Loading rule scopes");
        Self::register(&mut state, identity, xml)
    }

    /// Load every rule-definition file listed in an index file.
    ///
    /// One path per line, relative to the index file's directory; blank lines
    /// and lines starting with `#` are ignored.
    pub fn load_index(&self, index: &Path) -> usize {
        let content = match fs::read_to_string(index) {
            Ok(content) => content,
            Err(e) => {
                warn!(index = %index.display(), error = %e, "Failed to read rule definition index");
                return 0;
            }
        };

        let base = index.parent().unwrap_or_else(|| Path::new("."));
        let declared: Vec<_> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| base.join(line.trim_start_matches('/')))
            .collect();

        if declared.is_empty() {
            debug!(index = %index.display(), "No rule definitions declared in index");
            return 0;
        }

        info!(
            index = %index.display(),
            count = declared.len(),
            "Loading rule definitions declared in index"
        );
        declared.iter().map(|path| self.load_path(path)).sum()
    }

    fn register(state: &mut RegistryState, identity: &str, xml: &str) -> usize {
        match parse_definitions(identity, xml) {
            Ok(rules) => {
                let count = rules.len();
                for rule in rules {
                    let scope = rule.scope();
                    state.scopes.insert(rule.key, scope);
                }
                debug!(resource = identity, count, "Loaded rule scopes");
                count
            }
            Err(err) => {
                error!(error = %err, "Rule definitions contribute no scopes");
                0
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse every `<rule>` element of a rule-definition document.
///
/// Rules without a key are skipped. Unknown child elements are skipped
/// together with their whole subtree.
pub fn parse_definitions(identity: &str, xml: &str) -> Result<Vec<RuleDescriptor>, DefinitionError> {
    let failed = |err: XmlError| DefinitionError::Xml {
        path: identity.to_string(),
        message: err.to_string(),
    };

    let mut reader = xml::reader(xml);
    let mut rules = Vec::new();
    loop {
        match reader.read_event().map_err(|e| failed(xml::malformed(e)))? {
            Event::Start(e) if xml::local_name(&e) == RULE_ELEMENT => {
                if let Some(rule) = read_rule(&mut reader, key_attribute(&e)).map_err(failed)? {
                    rules.push(rule);
                }
            }
            Event::Empty(e) if xml::local_name(&e) == RULE_ELEMENT => {
                if let Some(key) = key_attribute(&e) {
                    rules.push(RuleDescriptor {
                        key,
                        name: String::new(),
                        tags: BTreeSet::new(),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rules)
}

fn read_rule(
    reader: &mut Reader<&[u8]>,
    mut key: Option<String>,
) -> Result<Option<RuleDescriptor>, XmlError> {
    let mut name = String::new();
    let mut tags = BTreeSet::new();

    loop {
        match reader.read_event().map_err(xml::malformed)? {
            Event::End(e) if e.local_name().as_ref().eq_ignore_ascii_case(RULE_ELEMENT.as_bytes()) => {
                break
            }
            Event::Start(e) => match xml::local_name(&e).as_str() {
                "key" => {
                    let text = xml::read_text(reader)?;
                    if !text.trim().is_empty() {
                        key = Some(text.trim().to_string());
                    }
                }
                "name" | "title" => name = xml::read_text(reader)?.trim().to_string(),
                "tag" => {
                    let text = xml::read_text(reader)?;
                    if !text.trim().is_empty() {
                        tags.insert(text.trim().to_string());
                    }
                }
                "tags" => {
                    let text = xml::read_text(reader)?;
                    tags.extend(
                        text.split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string),
                    );
                }
                _ => xml::skip(reader, &e)?,
            },
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(key.map(|key| RuleDescriptor { key, name, tags }))
}

fn key_attribute(e: &BytesStart<'_>) -> Option<String> {
    xml::attribute(e, "key")
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
