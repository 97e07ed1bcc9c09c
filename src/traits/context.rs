// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Handles given to processors while they run.

use crate::conditions::SignalTable;
use crate::errors::SeedError;
use crate::observability::messages::conditions::SignalPublished;
use crate::observability::messages::StructuredLog;
use crate::seeds::{SeedDistributor, SeedLookup};
use crate::traits::provider::GeometryProvider;

/// Passed to [`Processor::init`](crate::traits::Processor::init).
pub struct InitContext<'a> {
    name: &'a str,
    seeds: &'a mut SeedDistributor,
    geometry: Option<&'a dyn GeometryProvider>,
}

impl<'a> InitContext<'a> {
    pub fn new(
        name: &'a str,
        seeds: &'a mut SeedDistributor,
        geometry: Option<&'a dyn GeometryProvider>,
    ) -> Self {
        Self {
            name,
            seeds,
            geometry,
        }
    }

    /// The processor's name in the chain.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Ask for a per-event seed under the processor's own name.
    pub fn register_for_seeds(&mut self) -> Result<u32, SeedError> {
        self.seeds.add_entry(self.name)
    }

    pub fn geometry(&self) -> Option<&dyn GeometryProvider> {
        self.geometry
    }
}

/// Passed to the event hooks: signal publication and the processor's seed.
pub struct EventContext<'a> {
    name: &'a str,
    signals: &'a mut SignalTable,
    seeds: &'a dyn SeedLookup,
}

impl<'a> EventContext<'a> {
    pub fn new(name: &'a str, signals: &'a mut SignalTable, seeds: &'a dyn SeedLookup) -> Self {
        Self {
            name,
            signals,
            seeds,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Publish the unscoped signal named after this processor.
    pub fn set_return_value(&mut self, value: bool) {
        SignalPublished {
            key: self.name,
            value,
        }
        .log();
        self.signals.set(self.name, value);
    }

    /// Publish `"<name>.<suffix>"`.
    pub fn set_named_return_value(&mut self, suffix: &str, value: bool) {
        let key = format!("{}.{}", self.name, suffix);
        SignalPublished { key: &key, value }.log();
        self.signals.set(key, value);
    }

    /// Read any signal published so far for this event.
    pub fn signal(&self, key: &str) -> Option<bool> {
        self.signals.get(key)
    }

    /// This processor's seed for the current event.
    pub fn seed(&self) -> Result<u32, SeedError> {
        self.seeds.seed_for(self.name)
    }
}
