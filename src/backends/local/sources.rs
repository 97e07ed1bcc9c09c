// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{ensure, Context};

use crate::config::Parameters;
use crate::model::{Event, Record, RunHeader};
use crate::traits::DataSource;

/// Synthetic input: `runs` runs of `events` empty events each.
///
/// Runs are numbered from `first_run`, events from 0 within every run.
pub struct CountingSource {
    runs: u32,
    events: u32,
    first_run: u32,
    detector: String,
    cursor: Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// The header of run index `n` is next
    Header(u32),
    /// Event `event` of run index `run` is next
    Event { run: u32, event: u32 },
    Exhausted,
}

impl CountingSource {
    pub fn new() -> Self {
        Self {
            runs: 1,
            events: 10,
            first_run: 0,
            detector: "counting".to_string(),
            cursor: Cursor::Header(0),
        }
    }

    pub fn with_shape(runs: u32, events: u32) -> Self {
        Self {
            runs,
            events,
            ..Self::new()
        }
    }

    fn advance(&mut self) -> Option<Record> {
        match self.cursor {
            Cursor::Header(run) if run < self.runs => {
                self.cursor = Cursor::Event { run, event: 0 };
                Some(Record::RunHeader(RunHeader::new(
                    self.first_run + run,
                    self.detector.clone(),
                )))
            }
            Cursor::Event { run, event } if event < self.events => {
                self.cursor = Cursor::Event {
                    run,
                    event: event + 1,
                };
                Some(Record::Event(Event::new(self.first_run + run, event)))
            }
            Cursor::Event { run, .. } => {
                self.cursor = Cursor::Header(run + 1);
                self.advance()
            }
            Cursor::Header(_) | Cursor::Exhausted => {
                self.cursor = Cursor::Exhausted;
                None
            }
        }
    }
}

impl Default for CountingSource {
    fn default() -> Self {
        Self::new()
    }
}

fn parameter_u32(parameters: &Parameters, key: &str) -> anyhow::Result<Option<u32>> {
    parameters
        .get_u64(key)?
        .map(|value| u32::try_from(value).with_context(|| format!("'{}' does not fit in 32 bits", key)))
        .transpose()
}

impl DataSource for CountingSource {
    fn type_name(&self) -> &'static str {
        "CountingSource"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        if let Some(runs) = parameter_u32(parameters, "runs")? {
            self.runs = runs;
        }
        if let Some(events) = parameter_u32(parameters, "events")? {
            self.events = events;
        }
        if let Some(first_run) = parameter_u32(parameters, "first_run")? {
            self.first_run = first_run;
        }
        if let Some(detector) = parameters.get_str("detector")? {
            self.detector = detector.to_string();
        }
        ensure!(
            self.first_run.checked_add(self.runs).is_some(),
            "run numbers overflow"
        );
        self.cursor = Cursor::Header(0);
        Ok(())
    }

    fn next_record(&mut self) -> anyhow::Result<Option<Record>> {
        Ok(self.advance())
    }

    fn rewind(&mut self) -> anyhow::Result<()> {
        self.cursor = Cursor::Header(0);
        Ok(())
    }
}
