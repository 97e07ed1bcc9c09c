// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::ensure;

use crate::config::Parameters;
use crate::model::{Event, RunHeader};
use crate::observability::messages::monitor::{StatusSummary, StatusTick};
use crate::observability::messages::StructuredLog;
use crate::traits::{EventContext, HookResult, InitContext, Processor, StepOutcome};

/// Logs a progress line every `how_often` events.
pub struct StatusMonitor {
    name: String,
    how_often: u64,
    runs_seen: u64,
    events_seen: u64,
}

impl StatusMonitor {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            how_often: 1,
            runs_seen: 0,
            events_seen: 0,
        }
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    pub fn runs_seen(&self) -> u64 {
        self.runs_seen
    }
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for StatusMonitor {
    fn type_name(&self) -> &'static str {
        "StatusMonitor"
    }

    fn description(&self) -> &str {
        "Logs run and event numbers every `how_often` events"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        if let Some(how_often) = parameters.get_u64("how_often")? {
            ensure!(how_often > 0, "how_often must be at least 1");
            self.how_often = how_often;
        }
        Ok(())
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> anyhow::Result<()> {
        self.name = ctx.name().to_string();
        Ok(())
    }

    fn process_run_header(&mut self, _header: &RunHeader) -> anyhow::Result<()> {
        self.runs_seen += 1;
        Ok(())
    }

    fn process_event(&mut self, event: &Event, _ctx: &mut EventContext<'_>) -> HookResult {
        self.events_seen += 1;
        if self.events_seen % self.how_often == 0 {
            StatusTick {
                monitor: &self.name,
                run: event.run_number,
                event: event.event_number,
                events_seen: self.events_seen,
            }
            .log();
        }
        Ok(StepOutcome::Continue)
    }

    fn end(&mut self) -> anyhow::Result<()> {
        StatusSummary {
            monitor: &self.name,
            runs_seen: self.runs_seen,
            events_seen: self.events_seen,
        }
        .log();
        Ok(())
    }
}
