// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::config::Parameters;
use crate::model::Event;
use crate::traits::{EventContext, HookResult, Processor, StepOutcome};

/// Skips the rest of the chain for the listed event numbers.
pub struct EventSkipper {
    events: HashSet<u64>,
    reason: String,
}

impl EventSkipper {
    pub fn new() -> Self {
        Self {
            events: HashSet::new(),
            reason: "event listed for skipping".to_string(),
        }
    }
}

impl Default for EventSkipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for EventSkipper {
    fn type_name(&self) -> &'static str {
        "EventSkipper"
    }

    fn description(&self) -> &str {
        "Skips events whose number is listed in `events`"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        self.events = parameters
            .get_u64_list("events")?
            .unwrap_or_default()
            .into_iter()
            .collect();
        if let Some(reason) = parameters.get_str("reason")? {
            self.reason = reason.to_string();
        }
        Ok(())
    }

    fn process_event(&mut self, event: &Event, _ctx: &mut EventContext<'_>) -> HookResult {
        if self.events.contains(&u64::from(event.event_number)) {
            Ok(StepOutcome::skip(self.reason.clone()))
        } else {
            Ok(StepOutcome::Continue)
        }
    }
}
