//! # Gateway Configuration
//!
//! A single JSON file (`tablegate.json` by default):
//!
//! ```json
//! {
//!   "server": { "root": "/tablegate", "host": "0.0.0.0", "port": 8080 },
//!   "aliases": [
//!     {
//!       "name": "demo1",
//!       "dialect": "hsql",
//!       "database": "demo1",
//!       "acl": { "allow": "all", "rules": { "users": { "allow": "admin" } } },
//!       "tables": [
//!         { "name": "car", "primary_key": "cid",
//!           "columns": [ { "name": "cid", "type": "integer" } ] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `TABLEGATE_SERVER_HOST`, `TABLEGATE_SERVER_PORT` and
//! `TABLEGATE_SERVER_ROOT` override the file. A validated configuration
//! builds an immutable [`Snapshot`].

pub mod errors;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::acl::{AccessControl, AccessRule, Operation, PrincipalSpec, StaticRuleSource};
use crate::dialect::{DialectKind, DialectRegistry};
use crate::gateway::{DatabaseDriver, Gateway, StaticMetadata};
use crate::http_server::HttpServerConfig;
use crate::model::table::{validate_identifier, DEFAULT_PRIMARY_KEY};
use crate::model::{Column, Table};
use crate::observability::{log_event_with_fields, Event};

pub use errors::{ConfigError, ConfigResult};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "tablegate.json";

pub const ENV_HOST: &str = "TABLEGATE_SERVER_HOST";
pub const ENV_PORT: &str = "TABLEGATE_SERVER_PORT";
pub const ENV_ROOT: &str = "TABLEGATE_SERVER_ROOT";

/// Whole configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
}

/// One database alias
#[derive(Debug, Clone, Deserialize)]
pub struct AliasConfig {
    pub name: String,
    pub dialect: DialectKind,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub acl: AclConfig,
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

/// Access rules of one alias. No `allow` means no alias default rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AclConfig {
    #[serde(default)]
    pub allow: Option<PrincipalSpec>,
    #[serde(default)]
    pub operations: Option<Vec<Operation>>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// Rule for a single resource
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub allow: PrincipalSpec,
    #[serde(default)]
    pub operations: Option<Vec<Operation>>,
}

/// Declared table
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

impl GatewayConfig {
    /// Read, apply environment overrides and validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let result = Self::from_json(&text).and_then(|mut config| {
            config.apply_env(|name| std::env::var(name).ok())?;
            config.validate()?;
            Ok(config)
        });

        let shown = path.display().to_string();
        match &result {
            Ok(config) => {
                let aliases = config.aliases.len().to_string();
                log_event_with_fields(
                    Event::ConfigLoaded,
                    &[("path", shown.as_str()), ("aliases", aliases.as_str())],
                );
            }
            Err(e) => {
                let error = e.to_string();
                log_event_with_fields(
                    Event::ConfigInvalid,
                    &[("path", shown.as_str()), ("error", error.as_str())],
                );
            }
        }
        result
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply server overrides from `lookup` (the process environment in
    /// [`GatewayConfig::load`])
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(root) = lookup(ENV_ROOT) {
            self.server.root = root;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.root.trim().is_empty() {
            return Err(ConfigError::Missing("server.root"));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Missing("server.host"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Missing("server.port"));
        }
        if self.aliases.is_empty() {
            return Err(ConfigError::NoAliases);
        }

        let mut seen = HashSet::new();
        for alias in &self.aliases {
            let name = alias.name.trim();
            if name.is_empty() || name.contains('/') || name != alias.name {
                return Err(ConfigError::InvalidAlias(alias.name.clone()));
            }
            if !seen.insert(name) {
                return Err(ConfigError::InvalidAlias(format!("{} is declared twice", name)));
            }
            if alias.database.trim().is_empty() {
                return Err(ConfigError::MissingDatabase(alias.name.clone()));
            }
            for table in &alias.tables {
                validate_table(&alias.name, table)?;
            }
        }
        Ok(())
    }

    /// Validate and build the read-only runtime snapshot
    pub fn snapshot(&self) -> ConfigResult<Snapshot> {
        self.validate()?;

        let dialects = DialectRegistry::new(self.aliases.iter().map(|a| (a.name.clone(), a.dialect)));

        let mut metadata = StaticMetadata::new();
        for alias in &self.aliases {
            for table in &alias.tables {
                metadata = metadata.with_table(
                    alias.name.clone(),
                    Table::new(&table.name, &table.primary_key, table.columns.clone()),
                );
            }
        }

        let rules = StaticRuleSource::new(self.aliases.iter().flat_map(alias_rules));

        Ok(Snapshot {
            server: self.server.clone(),
            dialects,
            metadata: Arc::new(metadata),
            rules: Arc::new(rules),
        })
    }
}

fn validate_table(alias: &str, table: &TableConfig) -> ConfigResult<()> {
    let invalid = |reason: String| ConfigError::InvalidTable {
        alias: alias.to_string(),
        table: table.name.clone(),
        reason,
    };

    validate_identifier(&table.name).map_err(|e| invalid(e.to_string()))?;
    validate_identifier(&table.primary_key).map_err(|e| invalid(e.to_string()))?;

    let mut names = HashSet::new();
    for column in &table.columns {
        validate_identifier(&column.name).map_err(|e| invalid(e.to_string()))?;
        if !names.insert(column.name.to_ascii_lowercase()) {
            return Err(invalid(format!("column {} is declared twice", column.name)));
        }
    }

    if !table.columns.is_empty() && !names.contains(&table.primary_key.to_ascii_lowercase()) {
        return Err(invalid(format!(
            "primary key {} is not a declared column",
            table.primary_key
        )));
    }
    Ok(())
}

fn alias_rules(alias: &AliasConfig) -> Vec<AccessRule> {
    let mut rules = Vec::new();

    if let Some(allow) = &alias.acl.allow {
        let mut rule = AccessRule::alias_default(alias.name.clone(), allow.clone());
        if let Some(operations) = &alias.acl.operations {
            rule = rule.with_operations(operations.iter().copied());
        }
        rules.push(rule);
    }

    for (resource, config) in &alias.acl.rules {
        let mut rule =
            AccessRule::for_resource(alias.name.clone(), resource.clone(), config.allow.clone());
        if let Some(operations) = &config.operations {
            rule = rule.with_operations(operations.iter().copied());
        }
        rules.push(rule);
    }
    rules
}

/// Immutable runtime state built from a validated configuration
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub server: HttpServerConfig,
    pub dialects: DialectRegistry,
    pub metadata: Arc<StaticMetadata>,
    pub rules: Arc<StaticRuleSource>,
}

impl Snapshot {
    /// Wire the snapshot to a driver
    pub fn gateway(&self, driver: Arc<dyn DatabaseDriver>) -> Gateway {
        Gateway::new(
            self.dialects.clone(),
            self.metadata.clone(),
            AccessControl::new(self.rules.clone()),
            driver,
        )
    }
}
