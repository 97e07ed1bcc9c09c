// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The outer event loop: reads records from a data source and feeds them to
//! the scheduler.

use std::time::Instant;

use crate::config::GlobalConfig;
use crate::engine::{RunReport, Scheduler};
use crate::errors::SchedulerError;
use crate::model::Record;
use crate::observability::messages::runner::{InputRewound, JobFinished, JobStarted};
use crate::observability::messages::StructuredLog;
use crate::plugins::Plugin;
use crate::traits::{DataSource, GeometryProvider, StepOutcome};

/// Event limits applied by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Events read but not handed to the scheduler, counted from the start
    /// of the input (again after every rewind)
    pub skip_events: u64,
    /// 0 means no limit
    pub max_events: u64,
    pub max_rewinds: u32,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        GlobalConfig::default().into()
    }
}

impl From<&GlobalConfig> for RunnerOptions {
    fn from(global: &GlobalConfig) -> Self {
        Self {
            skip_events: global.skip_events,
            max_events: global.max_events,
            max_rewinds: global.max_rewinds,
        }
    }
}

impl From<GlobalConfig> for RunnerOptions {
    fn from(global: GlobalConfig) -> Self {
        (&global).into()
    }
}

/// What happened during [`JobRunner::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Events read since the last rewind, including skipped ones
    pub events_read: u64,
    /// Events handed to the scheduler, over the whole job
    pub events_processed: u64,
    pub run_headers: u64,
    pub rewinds: u32,
    /// Set when a processor or the event limit ended the job early
    pub stop_reason: Option<String>,
    pub report: RunReport,
}

/// Owns the scheduler together with the plugins it reads from.
///
/// Field order matters: the chain drops before the data source and the
/// geometry, so no processor outlives a module it came from.
pub struct JobRunner {
    scheduler: Scheduler,
    source: Plugin<Box<dyn DataSource>>,
    geometry: Option<Plugin<Box<dyn GeometryProvider>>>,
    options: RunnerOptions,
}

impl JobRunner {
    pub fn new(
        scheduler: Scheduler,
        source: Plugin<Box<dyn DataSource>>,
        geometry: Option<Plugin<Box<dyn GeometryProvider>>>,
        options: RunnerOptions,
    ) -> Self {
        Self {
            scheduler,
            source,
            geometry,
            options,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn geometry(&self) -> Option<&dyn GeometryProvider> {
        self.geometry.as_ref().map(|geometry| &***geometry)
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn set_max_events(&mut self, max_events: u64) {
        self.options.max_events = max_events;
    }

    /// Drain the data source through the chain and end the scheduler.
    ///
    /// `StopProcessing` ends the job early; `RewindJob` restarts the input,
    /// at most `max_rewinds` times. A fatal error still ends every processor
    /// before it is returned.
    pub fn run(&mut self) -> Result<JobSummary, SchedulerError> {
        let started = Instant::now();
        JobStarted {
            source: self.source.type_name(),
            processor_count: self.scheduler.chain().len(),
            skip_events: self.options.skip_events,
            max_events: self.options.max_events,
        }
        .log();

        let mut summary = JobSummary::default();
        if let Err(error) = self.pump(&mut summary) {
            // end() logs its own failures; the pump error is the one to report
            let _ = self.scheduler.end();
            return Err(error);
        }
        summary.report = self.scheduler.end()?;

        JobFinished {
            events_processed: summary.events_processed,
            stop_reason: summary.stop_reason.as_deref(),
            duration: started.elapsed(),
        }
        .log();
        Ok(summary)
    }

    fn pump(&mut self, summary: &mut JobSummary) -> Result<(), SchedulerError> {
        let source_name = self.source.type_name();
        let process_separately = !self.scheduler.options().allow_event_modification;

        loop {
            let record = self
                .source
                .next_record()
                .map_err(|e| SchedulerError::hook(source_name, "next_record", e))?;

            let mut event = match record {
                None => return Ok(()),
                Some(Record::RunHeader(mut header)) => {
                    self.scheduler.modify_run_header(&mut header)?;
                    self.scheduler.process_run_header(&header)?;
                    summary.run_headers += 1;
                    continue;
                }
                Some(Record::Event(event)) => event,
            };

            summary.events_read += 1;
            if summary.events_read <= self.options.skip_events {
                continue;
            }

            let mut outcome = self.scheduler.modify_event(&mut event)?;
            if outcome.is_continue() && process_separately {
                outcome = self.scheduler.process_event(&event)?;
            }
            summary.events_processed += 1;

            match outcome {
                StepOutcome::StopProcessing(reason) => {
                    summary.stop_reason = Some(reason);
                    return Ok(());
                }
                StepOutcome::RewindJob(reason) => {
                    summary.rewinds += 1;
                    if summary.rewinds > self.options.max_rewinds {
                        return Err(SchedulerError::TooManyRewinds(summary.rewinds));
                    }
                    InputRewound {
                        rewinds: summary.rewinds,
                        reason: &reason,
                    }
                    .log();
                    self.source
                        .rewind()
                        .map_err(|e| SchedulerError::hook(source_name, "rewind", e))?;
                    summary.events_read = 0;
                }
                StepOutcome::Continue | StepOutcome::SkipEvent(_) => {}
            }

            if self.options.max_events > 0 && summary.events_processed >= self.options.max_events
            {
                summary.stop_reason = Some(format!(
                    "reached the limit of {} events",
                    self.options.max_events
                ));
                return Ok(());
            }
        }
    }
}
