// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

/// Accumulated cost of one processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorTiming {
    pub elapsed: Duration,
    /// Events that went through the process phase of this processor
    pub events: u64,
}

/// Timing per processor and skip counts per reason, filled by the scheduler.
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    order: Vec<String>,
    timings: HashMap<String, ProcessorTiming>,
    skips: BTreeMap<String, u64>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a zero entry for `name`. Registering twice keeps the entry.
    pub fn register(&mut self, name: &str) {
        if !self.timings.contains_key(name) {
            self.order.push(name.to_string());
            self.timings
                .insert(name.to_string(), ProcessorTiming::default());
        }
    }

    /// Add `elapsed` to the processor's bucket; `count_event` also bumps the
    /// event count.
    pub fn record(&mut self, name: &str, elapsed: Duration, count_event: bool) {
        if !self.timings.contains_key(name) {
            self.register(name);
        }
        if let Some(timing) = self.timings.get_mut(name) {
            timing.elapsed += elapsed;
            if count_event {
                timing.events += 1;
            }
        }
    }

    pub fn record_skip(&mut self, reason: &str) {
        *self.skips.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn timing(&self, name: &str) -> Option<ProcessorTiming> {
        self.timings.get(name).copied()
    }

    pub fn skip_count(&self, reason: &str) -> u64 {
        self.skips.get(reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> u64 {
        self.skips.values().sum()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.timings.values().map(|t| t.elapsed).sum()
    }

    /// Snapshot for the end-of-job summary.
    pub fn report(&self) -> RunReport {
        let mut processors: Vec<ProcessorReport> = self
            .order
            .iter()
            .map(|name| {
                let timing = self.timings.get(name).copied().unwrap_or_default();
                ProcessorReport {
                    name: name.clone(),
                    elapsed: timing.elapsed,
                    events: timing.events,
                }
            })
            .collect();
        // stable: ties keep chain order
        processors.sort_by(|a, b| b.elapsed.cmp(&a.elapsed));

        RunReport {
            skipped: self
                .skips
                .iter()
                .map(|(reason, count)| (reason.clone(), *count))
                .collect(),
            total_elapsed: processors.iter().map(|p| p.elapsed).sum(),
            total_events: processors.iter().map(|p| p.events).sum(),
            total_skipped: self.total_skipped(),
            processors,
        }
    }
}

/// One row of the timing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorReport {
    pub name: String,
    pub elapsed: Duration,
    pub events: u64,
}

impl ProcessorReport {
    pub fn time_per_event(&self) -> Duration {
        if self.events == 0 {
            Duration::ZERO
        } else {
            let nanos = self.elapsed.as_nanos() / u128::from(self.events);
            u64::try_from(nanos).map_or(Duration::MAX, Duration::from_nanos)
        }
    }
}

/// End-of-job summary: skip counts by reason and processor timing sorted by
/// time spent, most expensive first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// (reason, count), ordered by reason
    pub skipped: Vec<(String, u64)>,
    pub processors: Vec<ProcessorReport>,
    pub total_elapsed: Duration,
    pub total_events: u64,
    pub total_skipped: u64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Skipped events: {}", self.total_skipped)?;
        for (reason, count) in &self.skipped {
            writeln!(f, "  {:>8}  {}", count, reason)?;
        }

        writeln!(
            f,
            "{:<28} {:>12} {:>10} {:>14}",
            "processor", "time [ms]", "events", "per event [ms]"
        )?;
        for row in &self.processors {
            writeln!(
                f,
                "{:<28} {:>12.3} {:>10} {:>14.3}",
                row.name,
                millis(row.elapsed),
                row.events,
                millis(row.time_per_event())
            )?;
        }
        write!(
            f,
            "{:<28} {:>12.3} {:>10}",
            "total",
            millis(self.total_elapsed),
            self.total_events
        )
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
