//! # Stored Routine Calls
//!
//! A call specification is an ordered list of parameters whose ordinal
//! indexes must be exactly `1..=n`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ModelError, ModelResult};
use super::mutation::BindValue;
use super::table::validate_identifier;

/// Parameter direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDirection {
    In,
    Out,
}

/// One routine parameter, in the JSON shape callers send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCallParam {
    pub name: String,
    pub index: usize,
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(rename = "outParameter", default)]
    pub out_parameter: bool,
}

impl StoredCallParam {
    pub fn direction(&self) -> ParamDirection {
        if self.out_parameter {
            ParamDirection::Out
        } else {
            ParamDirection::In
        }
    }
}

/// A validated routine call
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCall {
    routine: String,
    params: Vec<StoredCallParam>,
    /// IN values aligned with `params`; OUT positions hold `Null`
    binds: Vec<BindValue>,
}

impl StoredCall {
    /// Validate and order the parameters of a call to `routine`
    pub fn new(routine: impl Into<String>, mut params: Vec<StoredCallParam>) -> ModelResult<Self> {
        let routine = routine.into();
        validate_identifier(&routine)?;

        params.sort_by_key(|p| p.index);
        let mut binds = Vec::with_capacity(params.len());
        for (position, param) in params.iter().enumerate() {
            if param.index != position + 1 {
                return Err(ModelError::InvalidCall(format!(
                    "parameter indexes must be contiguous from 1, found {} at position {}",
                    param.index,
                    position + 1
                )));
            }
            if param.name.trim().is_empty() {
                return Err(ModelError::InvalidCall(format!(
                    "parameter {} has no name",
                    param.index
                )));
            }
            if param.out_parameter && param.value.as_ref().is_some_and(|v| !v.is_null()) {
                return Err(ModelError::InvalidCall(format!(
                    "out parameter {} cannot carry a value",
                    param.name
                )));
            }
            let bind = match &param.value {
                Some(value) if !param.out_parameter => BindValue::from_json(value).map_err(|_| {
                    ModelError::InvalidCall(format!("parameter {} must be a scalar value", param.name))
                })?,
                _ => BindValue::Null,
            };
            binds.push(bind);
        }

        Ok(Self {
            routine,
            params,
            binds,
        })
    }

    /// Parse the JSON array form
    pub fn from_json(routine: impl Into<String>, body: &str) -> ModelResult<Self> {
        let params: Vec<StoredCallParam> = if body.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(body).map_err(|e| ModelError::InvalidCall(e.to_string()))?
        };
        Self::new(routine, params)
    }

    pub fn routine(&self) -> &str {
        &self.routine
    }

    pub fn params(&self) -> &[StoredCallParam] {
        &self.params
    }

    /// Parameters in index order, each paired with its IN value
    pub fn arguments(&self) -> impl Iterator<Item = (&StoredCallParam, &BindValue)> {
        self.params.iter().zip(self.binds.iter())
    }

    /// Bind values for IN parameters, in index order
    pub fn in_values(&self) -> Vec<BindValue> {
        self.arguments()
            .filter(|(p, _)| p.direction() == ParamDirection::In)
            .map(|(_, v)| v.clone())
            .collect()
    }
}
