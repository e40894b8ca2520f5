// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Instrument parameter block

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SourceError;

/// A single parameter value as stored by the instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ParameterValue {
    /// Numeric value, parsing text when needed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(n) => Some(*n),
            ParameterValue::Text(s) => s.trim().parse().ok(),
            ParameterValue::Other(_) => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

/// Parameter map with case-insensitive lookup
///
/// Instrument files spell keys in upper case (`LWN`) while users usually
/// ask for lower case (`lwn`); both resolve to the same entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, ParameterValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`Parameters::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look a key up, exact spelling first, then ignoring ASCII case
    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key).or_else(|| {
            self.values
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    /// Numeric value of `key`
    ///
    /// ### Errors
    ///
    /// [`SourceError::MissingParameter`] when absent,
    /// [`SourceError::InvalidParameter`] when not numeric.
    pub fn get_f64(&self, key: &str) -> Result<f64, SourceError> {
        let value = self
            .get(key)
            .ok_or_else(|| SourceError::MissingParameter(key.to_string()))?;
        value.as_f64().ok_or_else(|| SourceError::InvalidParameter {
            key: key.to_string(),
            value: format!("{:?}", value),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
