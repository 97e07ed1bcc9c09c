// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for condition registration and signal publication.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A named condition was parsed and stored.
///
/// # Log Level
/// `debug!` - Detailed lifecycle information
pub struct ConditionRegistered<'a> {
    pub name: &'a str,
    pub expression: &'a str,
}

impl Display for ConditionRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Condition for '{}': {}", self.name, self.expression)
    }
}

impl StructuredLog for ConditionRegistered<'_> {
    fn log(&self) {
        tracing::debug!(name = self.name, expression = self.expression, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("condition_registered", span_name = name, condition = self.name)
    }
}

/// A processor set a signal for the current event.
///
/// # Log Level
/// `trace!` - Emitted many times per event
pub struct SignalPublished<'a> {
    pub key: &'a str,
    pub value: bool,
}

impl Display for SignalPublished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Signal '{}' = {}", self.key, self.value)
    }
}

impl StructuredLog for SignalPublished<'_> {
    fn log(&self) {
        tracing::trace!(key = self.key, value = self.value, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("signal_published", span_name = name, key = self.key, value = self.value)
    }
}
