// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the job lifecycle around a data source.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// The runner is about to read from its data source.
///
/// # Log Level
/// `info!` - Important operational event
pub struct JobStarted<'a> {
    pub source: &'a str,
    pub processor_count: usize,
    pub skip_events: u64,
    pub max_events: u64,
}

impl Display for JobStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting job: source '{}', {} processors, skipping {} events, max events {}",
            self.source,
            self.processor_count,
            self.skip_events,
            if self.max_events == 0 {
                "unlimited".to_string()
            } else {
                self.max_events.to_string()
            }
        )
    }
}

impl StructuredLog for JobStarted<'_> {
    fn log(&self) {
        tracing::info!(
            source = self.source,
            processor_count = self.processor_count,
            skip_events = self.skip_events,
            max_events = self.max_events,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "job",
            span_name = name,
            source = self.source,
            processor_count = self.processor_count,
        )
    }
}

/// The input was restarted from the beginning.
///
/// # Log Level
/// `info!` - Changes the course of the whole job
pub struct InputRewound<'a> {
    pub rewinds: u32,
    pub reason: &'a str,
}

impl Display for InputRewound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rewinding input (rewind #{}): {}", self.rewinds, self.reason)
    }
}

impl StructuredLog for InputRewound<'_> {
    fn log(&self) {
        tracing::info!(rewinds = self.rewinds, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("input_rewound", span_name = name, rewinds = self.rewinds)
    }
}

/// The job drained its input or was stopped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct JobFinished<'a> {
    pub events_processed: u64,
    pub stop_reason: Option<&'a str>,
    pub duration: Duration,
}

impl Display for JobFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.stop_reason {
            Some(reason) => write!(
                f,
                "Job stopped after {} events in {:?}: {}",
                self.events_processed, self.duration, reason
            ),
            None => write!(
                f,
                "Job finished: {} events in {:?}",
                self.events_processed, self.duration
            ),
        }
    }
}

impl StructuredLog for JobFinished<'_> {
    fn log(&self) {
        tracing::info!(
            events_processed = self.events_processed,
            stop_reason = self.stop_reason,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "job_finished",
            span_name = name,
            events_processed = self.events_processed,
            duration = ?self.duration,
        )
    }
}
