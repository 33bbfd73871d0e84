//! # Single-Row Mutations
//!
//! Insert, update and delete descriptions. Values always travel as bind
//! values; nothing a caller sends is rendered into SQL text except declared
//! (or syntax-checked) identifiers.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{ModelError, ModelResult};
use super::predicate::Predicate;
use super::table::Table;

/// A value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    Text(String),
    Null,
}

impl BindValue {
    pub fn text(value: impl Into<String>) -> Self {
        BindValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BindValue::Text(s) => Some(s),
            BindValue::Null => None,
        }
    }

    /// Convert a scalar JSON value. Arrays and objects are rejected.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        match value {
            Value::Null => Ok(BindValue::Null),
            Value::String(s) => Ok(BindValue::Text(s.clone())),
            Value::Number(n) => Ok(BindValue::Text(n.to_string())),
            Value::Bool(b) => Ok(BindValue::Text(b.to_string())),
            Value::Array(_) | Value::Object(_) => Err(ModelError::InvalidPayload(
                "nested values are not supported".to_string(),
            )),
        }
    }
}

/// Ordered column/value pairs sent by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    values: Vec<(String, BindValue)>,
}

impl Payload {
    /// Parse a JSON object body
    pub fn from_json(body: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ModelError::InvalidPayload(e.to_string()))?;
        match value {
            Value::Object(map) => Self::from_map(&map),
            _ => Err(ModelError::InvalidPayload(
                "body must be a JSON object".to_string(),
            )),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> ModelResult<Self> {
        let values = map
            .iter()
            .map(|(k, v)| Ok((k.clone(), BindValue::from_json(v)?)))
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { values })
    }

    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_form(body: &[u8]) -> ModelResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ModelError::InvalidPayload(e.to_string()))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Build from form pairs; every form value is text
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), BindValue::Text(v.into())))
                .collect(),
        }
    }

    pub fn values(&self) -> &[(String, BindValue)] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the payload back as a JSON row
    pub fn to_row(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    BindValue::Text(s) => Value::String(s.clone()),
                    BindValue::Null => Value::Null,
                };
                (k.clone(), value)
            })
            .collect()
    }

    fn resolve(&self, table: &Table) -> ModelResult<Vec<(String, BindValue)>> {
        if self.values.is_empty() {
            return Err(ModelError::EmptyPayload(table.name().to_string()));
        }
        self.values
            .iter()
            .map(|(k, v)| Ok((table.resolve_column(k)?, v.clone())))
            .collect()
    }
}

/// A single-row mutation
#[derive(Debug, Clone)]
pub enum Mutation {
    Insert {
        table: Arc<Table>,
        values: Vec<(String, BindValue)>,
    },
    Update {
        table: Arc<Table>,
        values: Vec<(String, BindValue)>,
        key: Predicate,
    },
    Delete {
        table: Arc<Table>,
        key: Predicate,
    },
}

impl Mutation {
    pub fn insert(table: Arc<Table>, payload: &Payload) -> ModelResult<Self> {
        let values = payload.resolve(&table)?;
        Ok(Mutation::Insert { table, values })
    }

    pub fn update(
        table: Arc<Table>,
        payload: &Payload,
        key_column: &str,
        key_value: &str,
    ) -> ModelResult<Self> {
        let values = payload.resolve(&table)?;
        let key = Predicate::equals(table.resolve_column(key_column)?, key_value);
        Ok(Mutation::Update { table, values, key })
    }

    pub fn delete(table: Arc<Table>, key_column: &str, key_value: &str) -> ModelResult<Self> {
        let key = Predicate::equals(table.resolve_column(key_column)?, key_value);
        Ok(Mutation::Delete { table, key })
    }

    pub fn table(&self) -> &Table {
        match self {
            Mutation::Insert { table, .. }
            | Mutation::Update { table, .. }
            | Mutation::Delete { table, .. } => table,
        }
    }
}
