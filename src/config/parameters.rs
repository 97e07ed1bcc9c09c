// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// String-keyed parameter bag handed to a plugin before `init`.
///
/// Values keep the type they had in the steering file. The typed getters
/// return `Ok(None)` for a missing key and an error for a value of the wrong
/// type, so plugins can apply their own defaults without masking typos in
/// the steering file.
///
/// # Example
/// ```
/// use the_chainwood::config::Parameters;
///
/// let params = Parameters::new().with("how_often", 10u64).with("label", "mon");
/// assert_eq!(params.get_u64("how_often").unwrap(), Some(10));
/// assert_eq!(params.get_str("label").unwrap(), Some("mon"));
/// assert_eq!(params.get_bool("missing").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        self.typed(key, "a string", Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.typed(key, "a boolean", Value::as_bool)
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.typed(key, "a non-negative integer", Value::as_u64)
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.typed(key, "an integer", Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        self.typed(key, "a number", Value::as_f64)
    }

    /// A sequence of integers, e.g. `skip: [3, 7, 9]`
    pub fn get_u64_list(&self, key: &str) -> Result<Option<Vec<u64>>> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        let sequence = value
            .as_sequence()
            .ok_or_else(|| anyhow!("Parameter '{}' must be a list of integers", key))?;
        sequence
            .iter()
            .map(|item| {
                item.as_u64()
                    .ok_or_else(|| anyhow!("Parameter '{}' must be a list of integers", key))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &str,
        convert: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| anyhow!("Parameter '{}' must be {}, got {:?}", key, expected, value)),
        }
    }
}
