// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input records flowing through the processor chain.
//!
//! A job reads a stream of [`Record`]s from a data source: a [`RunHeader`] opens
//! a run, and every [`Event`] that follows belongs to that run until the next
//! header arrives. The engine never interprets event contents; processors read
//! and (in the modify phase) write named collections.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-run metadata, delivered once before the events of that run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHeader {
    pub run_number: u32,
    pub detector_name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl RunHeader {
    pub fn new(run_number: u32, detector_name: impl Into<String>) -> Self {
        Self {
            run_number,
            detector_name: detector_name.into(),
            ..Default::default()
        }
    }
}

/// One input record processed by every enabled chain member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub run_number: u32,
    pub event_number: u32,
    #[serde(default)]
    pub collections: HashMap<String, serde_json::Value>,
}

impl Event {
    pub fn new(run_number: u32, event_number: u32) -> Self {
        Self {
            run_number,
            event_number,
            collections: HashMap::new(),
        }
    }

    /// Get a named collection
    pub fn collection(&self, name: &str) -> Option<&serde_json::Value> {
        self.collections.get(name)
    }

    /// Insert or replace a named collection
    pub fn set_collection(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.collections.insert(name.into(), value);
    }
}

/// Anything a data source can hand to the job runner.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    RunHeader(RunHeader),
    Event(Event),
}
