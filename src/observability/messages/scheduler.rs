// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the scheduler lifecycle and per-event control flow.
//!
//! This module contains message types for logging events related to:
//! * Chain assembly and processor initialization
//! * Run headers and per-event processing
//! * Event skips and job-level stop/rewind requests
//! * Teardown and the end-of-job report

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Chain assembled and every processor initialized.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::scheduler::SchedulerInitialized;
///
/// let msg = SchedulerInitialized {
///     processor_count: 5,
///     modifier_count: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct SchedulerInitialized {
    pub processor_count: usize,
    pub modifier_count: usize,
}

impl Display for SchedulerInitialized {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scheduler initialized: {} processors ({} event modifiers)",
            self.processor_count, self.modifier_count
        )
    }
}

impl StructuredLog for SchedulerInitialized {
    fn log(&self) {
        tracing::info!(
            processor_count = self.processor_count,
            modifier_count = self.modifier_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "scheduler_init",
            span_name = name,
            processor_count = self.processor_count,
            modifier_count = self.modifier_count,
        )
    }
}

/// A single processor was created, configured and initialized.
///
/// # Log Level
/// `debug!` - Detailed lifecycle information
pub struct ProcessorInitialized<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    pub condition: &'a str,
}

impl Display for ProcessorInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' of type '{}' initialized with condition '{}'",
            self.name, self.type_name, self.condition
        )
    }
}

impl StructuredLog for ProcessorInitialized<'_> {
    fn log(&self) {
        tracing::debug!(
            processor = self.name,
            type_name = self.type_name,
            condition = self.condition,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "processor_init",
            span_name = name,
            processor = self.name,
            type_name = self.type_name,
        )
    }
}

/// A run header went through the chain.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunHeaderProcessed<'a> {
    pub run_number: u32,
    pub detector_name: &'a str,
}

impl Display for RunHeaderProcessed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run {} started (detector '{}')",
            self.run_number, self.detector_name
        )
    }
}

impl StructuredLog for RunHeaderProcessed<'_> {
    fn log(&self) {
        tracing::info!(
            run = self.run_number,
            detector = self.detector_name,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_header",
            span_name = name,
            run = self.run_number,
            detector = self.detector_name,
        )
    }
}

/// An event is about to enter the chain.
///
/// # Log Level
/// `trace!` - Emitted once per event
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::StructuredLog;
/// use the_chainwood::observability::messages::scheduler::EventStarted;
///
/// let span = EventStarted { run: 1, event: 42 }.span("process_event");
/// let _guard = span.enter();
/// ```
pub struct EventStarted {
    pub run: u32,
    pub event: u32,
}

impl Display for EventStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Processing event {} of run {}", self.event, self.run)
    }
}

impl StructuredLog for EventStarted {
    fn log(&self) {
        tracing::trace!(run = self.run, event = self.event, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("event", span_name = name, run = self.run, event = self.event)
    }
}

/// A processor asked to skip the rest of the chain for this event.
///
/// # Log Level
/// `debug!` - Skips only show up as counts in the final report
pub struct EventSkipped<'a> {
    pub processor: &'a str,
    pub reason: &'a str,
    pub run: u32,
    pub event: u32,
}

impl Display for EventSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Event {} of run {} skipped by '{}': {}",
            self.event, self.run, self.processor, self.reason
        )
    }
}

impl StructuredLog for EventSkipped<'_> {
    fn log(&self) {
        tracing::debug!(
            processor = self.processor,
            reason = self.reason,
            run = self.run,
            event = self.event,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "event_skipped",
            span_name = name,
            processor = self.processor,
            reason = self.reason,
        )
    }
}

/// A processor requested a job-level stop or rewind.
///
/// # Log Level
/// `info!` - Changes the course of the whole job
pub struct JobControlRequested<'a> {
    pub processor: &'a str,
    pub request: &'a str,
    pub reason: &'a str,
}

impl Display for JobControlRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' requested {}: {}",
            self.processor, self.request, self.reason
        )
    }
}

impl StructuredLog for JobControlRequested<'_> {
    fn log(&self) {
        tracing::info!(
            processor = self.processor,
            request = self.request,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "job_control",
            span_name = name,
            processor = self.processor,
            request = self.request,
        )
    }
}

/// A processor's end hook failed during teardown.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ProcessorEndFailed<'a> {
    pub processor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessorEndFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Processor '{}' failed to end: {}", self.processor, self.error)
    }
}

impl StructuredLog for ProcessorEndFailed<'_> {
    fn log(&self) {
        tracing::error!(processor = self.processor, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "processor_end_failed",
            span_name = name,
            processor = self.processor,
            error = %self.error,
        )
    }
}

/// Every processor ended and the report is ready.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SchedulerEnded {
    pub processor_count: usize,
    pub skipped_events: u64,
    pub total_time: Duration,
}

impl Display for SchedulerEnded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scheduler ended: {} processors, {} skipped events, {:?} spent in processors",
            self.processor_count, self.skipped_events, self.total_time
        )
    }
}

impl StructuredLog for SchedulerEnded {
    fn log(&self) {
        tracing::info!(
            processor_count = self.processor_count,
            skipped_events = self.skipped_events,
            total_time_ms = self.total_time.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "scheduler_end",
            span_name = name,
            processor_count = self.processor_count,
            total_time = ?self.total_time,
        )
    }
}
