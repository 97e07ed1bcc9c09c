// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from parsing or evaluating condition expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    /// The expression could not be tokenized.
    #[error("Malformed condition '{expression}' at offset {offset}: {reason}")]
    Syntax {
        expression: String,
        offset: usize,
        reason: String,
    },

    /// The expression names a signal nobody published for the current event.
    #[error("Signal '{signal}' used in condition '{expression}' was not set for this event")]
    UnknownSignal { signal: String, expression: String },
}
