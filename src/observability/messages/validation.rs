// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for steering file validation.
//!
//! This module contains message types for logging events related to:
//! * Duplicate processor name detection
//! * Malformed condition expressions
//! * The overall validation verdict

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Duplicate processor name detected in configuration.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::validation::DuplicateProcessorName;
///
/// let msg = DuplicateProcessorName {
///     name: "monitor",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateProcessorName<'a> {
    pub name: &'a str,
}

impl Display for DuplicateProcessorName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate processor name: '{}'", self.name)
    }
}

impl StructuredLog for DuplicateProcessorName<'_> {
    fn log(&self) {
        tracing::error!(
            name = self.name,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            processor = self.name,
        )
    }
}

/// A processor condition failed to parse.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct MalformedCondition<'a> {
    pub name: &'a str,
    pub expression: &'a str,
    pub reason: &'a str,
}

impl Display for MalformedCondition<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' has a malformed condition '{}': {}",
            self.name, self.expression, self.reason
        )
    }
}

impl StructuredLog for MalformedCondition<'_> {
    fn log(&self) {
        tracing::error!(
            name = self.name,
            expression = self.expression,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            processor = self.name,
            expression = self.expression,
        )
    }
}

/// Validation finished.
///
/// # Log Level
/// `info!` on success, `error!` when problems were found
pub struct ValidationCompleted {
    pub processor_count: usize,
    pub error_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.error_count == 0 {
            write!(f, "Configuration valid: {} processors", self.processor_count)
        } else {
            write!(
                f,
                "Configuration invalid: {} problems across {} processors",
                self.error_count, self.processor_count
            )
        }
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        if self.error_count == 0 {
            tracing::info!(processor_count = self.processor_count, "{}", self);
        } else {
            tracing::error!(
                processor_count = self.processor_count,
                error_count = self.error_count,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "validation",
            span_name = name,
            processor_count = self.processor_count,
            error_count = self.error_count,
        )
    }
}
