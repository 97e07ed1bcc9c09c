// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::config::Parameters;
use crate::model::{Event, RunHeader};
use crate::traits::context::{EventContext, InitContext};

/// What the scheduler should do after a hook returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Carry on with the next chain member.
    Continue,
    /// Abandon the rest of the chain for this event only.
    SkipEvent(String),
    /// Stop reading input and end the job.
    StopProcessing(String),
    /// Restart the input from the beginning.
    RewindJob(String),
}

impl StepOutcome {
    pub fn skip(reason: impl Into<String>) -> Self {
        StepOutcome::SkipEvent(reason.into())
    }

    pub fn stop(reason: impl Into<String>) -> Self {
        StepOutcome::StopProcessing(reason.into())
    }

    pub fn rewind(reason: impl Into<String>) -> Self {
        StepOutcome::RewindJob(reason.into())
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, StepOutcome::Continue)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StepOutcome::Continue => None,
            StepOutcome::SkipEvent(reason)
            | StepOutcome::StopProcessing(reason)
            | StepOutcome::RewindJob(reason) => Some(reason),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Continue => write!(f, "continue"),
            StepOutcome::SkipEvent(reason) => write!(f, "skip event ({})", reason),
            StepOutcome::StopProcessing(reason) => write!(f, "stop processing ({})", reason),
            StepOutcome::RewindJob(reason) => write!(f, "rewind job ({})", reason),
        }
    }
}

/// Result of an event hook. Errors are fatal for the job.
pub type HookResult = anyhow::Result<StepOutcome>;

/// A unit of work in the processor chain.
///
/// The scheduler calls `configure` once with the processor's parameters, then
/// `init`, then the run header and event hooks for every record, and finally
/// `end`. Only `type_name` and `process_event` have no default.
pub trait Processor: Send {
    /// The plugin type this processor was registered under.
    fn type_name(&self) -> &'static str;

    fn description(&self) -> &str {
        ""
    }

    fn configure(&mut self, _parameters: &Parameters) -> anyhow::Result<()> {
        Ok(())
    }

    fn init(&mut self, _ctx: &mut InitContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn process_run_header(&mut self, _header: &RunHeader) -> anyhow::Result<()> {
        Ok(())
    }

    fn process_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> HookResult;

    /// Runs right after `process_event` unless checks are suppressed.
    fn check(&mut self, _event: &Event, _ctx: &mut EventContext<'_>) -> HookResult {
        Ok(StepOutcome::Continue)
    }

    fn end(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Probed once when the processor joins a chain.
    fn as_event_modifier(&mut self) -> Option<&mut dyn EventModifier> {
        None
    }
}

/// Optional capability of processors that rewrite their input.
pub trait EventModifier {
    fn modify_run_header(&mut self, _header: &mut RunHeader) -> anyhow::Result<()> {
        Ok(())
    }

    fn modify_event(&mut self, event: &mut Event, ctx: &mut EventContext<'_>) -> HookResult;
}
