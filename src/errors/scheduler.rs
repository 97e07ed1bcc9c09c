// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for chain assembly and scheduling.

use crate::engine::SchedulerState;
use crate::errors::{ConditionError, PluginError, SeedError};
use crate::plugins::PluginKind;
use thiserror::Error;

/// Violations of the processor chain invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Processor '{0}' is already part of the chain")]
    DuplicateMember(String),

    #[error("Processor '{0}' is not part of the chain")]
    UnknownMember(String),

    #[error("Chain position {index} is out of range (chain length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Fatal scheduler errors. Per-event control flow (skip, stop, rewind) is not
/// an error and travels as `StepOutcome` instead.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Scheduler cannot {operation} while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SchedulerState,
    },

    #[error("No active processors configured")]
    EmptyChain,

    #[error("Duplicate processor name: '{0}'")]
    DuplicateProcessor(String),

    #[error("Processor '{processor}' has unknown type '{type_name}'")]
    UnknownProcessorType {
        processor: String,
        type_name: String,
    },

    #[error("No {kind} plugin named '{name}' is registered")]
    UnknownPlugin { kind: PluginKind, name: String },

    #[error("Processor '{processor}' has an invalid condition: {source}")]
    InvalidCondition {
        processor: String,
        #[source]
        source: ConditionError,
    },

    #[error(transparent)]
    Condition(#[from] ConditionError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// A plugin hook returned an error.
    #[error("Processor '{processor}' failed in {hook}: {source}")]
    ProcessorFailed {
        processor: String,
        hook: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Event {event} of run {run} is already in flight")]
    EventInFlight { run: u32, event: u32 },

    #[error("Input rewound {0} times, giving up")]
    TooManyRewinds(u32),

    #[error("No data source configured")]
    MissingDataSource,
}

impl SchedulerError {
    pub(crate) fn hook(processor: &str, hook: &'static str, source: anyhow::Error) -> Self {
        SchedulerError::ProcessorFailed {
            processor: processor.to_string(),
            hook,
            source: source.into(),
        }
    }
}
