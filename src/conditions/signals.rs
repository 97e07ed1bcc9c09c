// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Literal names that are always defined, whatever processors publish.
const LITERALS: [(&str, bool); 4] = [
    ("true", true),
    ("True", true),
    ("false", false),
    ("False", false),
];

/// Per-event named booleans published by processors.
///
/// A fresh table holds only the four literals. Processors add an unscoped
/// entry under their own name and scoped entries as `"<name>.<suffix>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalTable(HashMap<String, bool>);

impl SignalTable {
    pub fn new() -> Self {
        let mut table = Self(HashMap::new());
        table.reset();
        table
    }

    /// Drop everything published so far, keeping only the literals
    pub fn reset(&mut self) {
        self.0.clear();
        for (key, value) in LITERALS {
            self.0.insert(key.to_string(), value);
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &bool)> {
        self.0.iter()
    }
}

impl Default for SignalTable {
    fn default() -> Self {
        Self::new()
    }
}
