// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{ensure, Context};

use crate::config::Parameters;
use crate::model::Event;
use crate::traits::{EventContext, HookResult, Processor, StepOutcome};

/// Asks the job to stop once it has seen `max_events` events.
pub struct RunStopper {
    max_events: u64,
    seen: u64,
}

impl RunStopper {
    pub fn new() -> Self {
        Self {
            max_events: 0,
            seen: 0,
        }
    }
}

impl Default for RunStopper {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for RunStopper {
    fn type_name(&self) -> &'static str {
        "RunStopper"
    }

    fn description(&self) -> &str {
        "Requests a stop after `max_events` events"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        let max_events = parameters
            .get_u64("max_events")?
            .context("RunStopper requires 'max_events'")?;
        ensure!(max_events > 0, "max_events must be at least 1");
        self.max_events = max_events;
        Ok(())
    }

    fn process_event(&mut self, _event: &Event, _ctx: &mut EventContext<'_>) -> HookResult {
        self.seen += 1;
        if self.seen >= self.max_events {
            Ok(StepOutcome::stop(format!("processed {} events", self.seen)))
        } else {
            Ok(StepOutcome::Continue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::SignalTable;
    use crate::seeds::SeedDistributor;

    #[test]
    fn test_stops_on_the_last_allowed_event() {
        let mut stopper = RunStopper::new();
        stopper
            .configure(&Parameters::new().with("max_events", 3u64))
            .unwrap();

        let seeds = SeedDistributor::new(1);
        let mut signals = SignalTable::new();
        let mut outcomes = Vec::new();
        for number in 0..3 {
            let mut ctx = EventContext::new("stopper", &mut signals, &seeds);
            outcomes.push(stopper.process_event(&Event::new(0, number), &mut ctx).unwrap());
        }

        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Continue,
                StepOutcome::Continue,
                StepOutcome::stop("processed 3 events")
            ]
        );
    }

    #[test]
    fn test_configuration_errors() {
        let test_cases = vec![
            ("missing", Parameters::new()),
            ("zero", Parameters::new().with("max_events", 0u64)),
            ("wrong type", Parameters::new().with("max_events", "ten")),
        ];

        for (name, params) in test_cases {
            assert!(RunStopper::new().configure(&params).is_err(), "{}", name);
        }
    }
}
