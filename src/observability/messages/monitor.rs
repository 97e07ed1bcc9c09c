// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types emitted by the built-in `StatusMonitor` processor.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Periodic progress line.
///
/// # Log Level
/// `info!` - The point of the monitor
pub struct StatusTick<'a> {
    pub monitor: &'a str,
    pub run: u32,
    pub event: u32,
    pub events_seen: u64,
}

impl Display for StatusTick<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}] run {} event {} ({} events so far)",
            self.monitor, self.run, self.event, self.events_seen
        )
    }
}

impl StructuredLog for StatusTick<'_> {
    fn log(&self) {
        tracing::info!(
            monitor = self.monitor,
            run = self.run,
            event = self.event,
            events_seen = self.events_seen,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("status_tick", span_name = name, monitor = self.monitor)
    }
}

/// Final tally at `end`.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StatusSummary<'a> {
    pub monitor: &'a str,
    pub runs_seen: u64,
    pub events_seen: u64,
}

impl Display for StatusSummary<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}] saw {} runs and {} events",
            self.monitor, self.runs_seen, self.events_seen
        )
    }
}

impl StructuredLog for StatusSummary<'_> {
    fn log(&self) {
        tracing::info!(
            monitor = self.monitor,
            runs_seen = self.runs_seen,
            events_seen = self.events_seen,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("status_summary", span_name = name, monitor = self.monitor)
    }
}
