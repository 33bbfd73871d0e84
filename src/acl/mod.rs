//! # Access Control
//!
//! Per-alias, per-resource allow rules.
//!
//! Lookup order for `(alias, resource)`:
//! 1. the rule scoped to exactly that resource
//! 2. the alias default rule
//! 3. deny
//!
//! Rule sets are loaded once at startup and only read afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

/// Principal used when a request carries no credentials
pub const ANONYMOUS: &str = "anonymous";

/// Operations a rule can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    Call,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Read,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Call,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Call => "call",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which principals a rule admits
///
/// Deserialises from `"all"`, `"none"`, a comma separated list
/// (`"alice, bob"`) or a JSON array of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPrincipals")]
pub enum PrincipalSpec {
    All,
    None,
    Only(BTreeSet<String>),
}

impl PrincipalSpec {
    pub fn only<I, S>(principals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrincipalSpec::Only(principals.into_iter().map(Into::into).collect())
    }

    pub fn admits(&self, principal: &str) -> bool {
        match self {
            PrincipalSpec::All => true,
            PrincipalSpec::None => false,
            PrincipalSpec::Only(names) => names.contains(principal),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrincipals {
    Text(String),
    List(Vec<String>),
}

impl TryFrom<RawPrincipals> for PrincipalSpec {
    type Error = String;

    fn try_from(raw: RawPrincipals) -> Result<Self, Self::Error> {
        let names: Vec<String> = match raw {
            RawPrincipals::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "all" | "*" => return Ok(PrincipalSpec::All),
                "none" | "" => return Ok(PrincipalSpec::None),
                _ => text.split(',').map(|s| s.trim().to_string()).collect(),
            },
            RawPrincipals::List(names) => names.into_iter().map(|s| s.trim().to_string()).collect(),
        };

        if names.iter().any(|n| n.is_empty()) {
            return Err("principal names cannot be empty".to_string());
        }
        Ok(PrincipalSpec::Only(names.into_iter().collect()))
    }
}

/// One allow rule. `resource: None` is the alias default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub alias: String,
    pub resource: Option<String>,
    pub allow: PrincipalSpec,
    pub operations: BTreeSet<Operation>,
}

impl AccessRule {
    /// Alias default rule granting every operation
    pub fn alias_default(alias: impl Into<String>, allow: PrincipalSpec) -> Self {
        Self {
            alias: alias.into(),
            resource: None,
            allow,
            operations: Operation::ALL.into_iter().collect(),
        }
    }

    /// Resource rule granting every operation
    pub fn for_resource(alias: impl Into<String>, resource: impl Into<String>, allow: PrincipalSpec) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::alias_default(alias, allow)
        }
    }

    pub fn with_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations = operations.into_iter().collect();
        self
    }

    pub fn permits(&self, principal: &str, operation: Operation) -> bool {
        self.operations.contains(&operation) && self.allow.admits(principal)
    }
}

/// Source of access rules per alias
pub trait AccessRuleSource: Send + Sync {
    fn rules(&self, alias: &str) -> &[AccessRule];
}

/// Rules held in memory, grouped by alias
#[derive(Debug, Clone, Default)]
pub struct StaticRuleSource {
    rules: HashMap<String, Vec<AccessRule>>,
}

impl StaticRuleSource {
    pub fn new(rules: impl IntoIterator<Item = AccessRule>) -> Self {
        let mut grouped: HashMap<String, Vec<AccessRule>> = HashMap::new();
        for rule in rules {
            grouped.entry(rule.alias.clone()).or_default().push(rule);
        }
        Self { rules: grouped }
    }
}

impl AccessRuleSource for StaticRuleSource {
    fn rules(&self, alias: &str) -> &[AccessRule] {
        self.rules.get(alias).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Access decision point
#[derive(Clone)]
pub struct AccessControl {
    source: Arc<dyn AccessRuleSource>,
}

impl AccessControl {
    pub fn new(source: Arc<dyn AccessRuleSource>) -> Self {
        Self { source }
    }

    /// Decide whether `principal` may perform `operation` on `alias/resource`
    pub fn permit(&self, alias: &str, resource: &str, principal: &str, operation: Operation) -> bool {
        let rules = self.source.rules(alias);

        let rule = rules
            .iter()
            .find(|r| {
                r.resource
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(resource))
            })
            .or_else(|| rules.iter().find(|r| r.resource.is_none()));

        let allowed = rule.is_some_and(|r| r.permits(principal, operation));
        if !allowed {
            log_event_with_fields(
                Event::AccessDenied,
                &[
                    ("alias", alias),
                    ("resource", resource),
                    ("principal", principal),
                    ("operation", operation.as_str()),
                    ("rule", if rule.is_some() { "matched" } else { "none" }),
                ],
            );
        }
        allowed
    }
}

impl fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControl").finish_non_exhaustive()
    }
}
