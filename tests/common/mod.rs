//! Shared fixtures: a scripted driver and a gateway over the demo tables

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use tablegate::config::GatewayConfig;
use tablegate::dialect::{RenderedCall, RenderedSql};
use tablegate::gateway::{DatabaseDriver, DriverError, ExecutionOutcome, Gateway, Row};

/// Driver double: records every statement and answers from a script.
/// An empty script answers with an empty outcome.
#[derive(Default)]
pub struct ScriptedDriver {
    script: Mutex<VecDeque<Result<ExecutionOutcome, DriverError>>>,
    executed: Mutex<Vec<RenderedSql>>,
    calls: Mutex<Vec<RenderedCall>>,
    tables: Vec<String>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: &[&str]) -> Self {
        Self {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn then(self, outcome: Result<ExecutionOutcome, DriverError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn then_rows(self, rows: Vec<Value>) -> Self {
        self.then(Ok(outcome_of(rows)))
    }

    pub fn then_count(self, count: u64) -> Self {
        self.then_rows(vec![json!({ "C1": count })])
    }

    pub fn then_affected(self, affected: u64) -> Self {
        self.then(Ok(ExecutionOutcome::affected(affected)))
    }

    pub fn then_vendor(self, state: &str, code: i32) -> Self {
        self.then(Err(DriverError::vendor(state, code, "vendor text")))
    }

    pub fn executed(&self) -> Vec<RenderedSql> {
        self.executed.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|r| r.sql).collect()
    }

    pub fn calls(&self) -> Vec<RenderedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self) -> Result<ExecutionOutcome, DriverError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecutionOutcome::default()))
    }
}

impl DatabaseDriver for ScriptedDriver {
    fn execute(&self, _alias: &str, statement: &RenderedSql) -> Result<ExecutionOutcome, DriverError> {
        self.executed.lock().unwrap().push(statement.clone());
        self.next()
    }

    fn list_tables(&self, _alias: &str, _statement: &str) -> Result<Vec<String>, DriverError> {
        Ok(self.tables.clone())
    }

    fn call(&self, _alias: &str, call: &RenderedCall) -> Result<ExecutionOutcome, DriverError> {
        self.calls.lock().unwrap().push(call.clone());
        self.next()
    }
}

pub fn outcome_of(rows: Vec<Value>) -> ExecutionOutcome {
    let rows: Vec<Row> = rows
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();
    let columns = rows
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default();
    ExecutionOutcome::rows(columns, rows)
}

/// Two aliases: `demo1` (hsql) open to everyone except for `users`, and
/// `demo2` (postgresql) where only `admin` may write.
pub const DEMO_CONFIG: &str = r#"{
    "server": { "root": "/tablegate", "port": 8080, "jwt_secret": "test-secret" },
    "aliases": [
        {
            "name": "demo1",
            "dialect": "hsql",
            "database": "demo1",
            "acl": { "allow": "all", "rules": { "users": { "allow": "none" } } },
            "tables": [
                { "name": "car", "primary_key": "cid", "columns": [
                    { "name": "cid", "type": "integer" },
                    { "name": "maker", "type": "text" },
                    { "name": "model", "type": "text" },
                    { "name": "month", "type": "integer" },
                    { "name": "credit", "type": "decimal" },
                    { "name": "last_update", "type": "timestamp" }
                ] }
            ]
        },
        {
            "name": "demo2",
            "dialect": "postgresql",
            "database": "demo2",
            "acl": { "allow": "all", "operations": ["read"],
                     "rules": { "car": { "allow": ["admin"] } } },
            "tables": []
        }
    ]
}"#;

pub fn demo_config() -> GatewayConfig {
    GatewayConfig::from_json(DEMO_CONFIG).unwrap()
}

pub fn gateway_with(driver: Arc<ScriptedDriver>) -> Gateway {
    demo_config().snapshot().unwrap().gateway(driver)
}
