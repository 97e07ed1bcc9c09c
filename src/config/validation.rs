// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Steering file validation.
//!
//! Validation runs every check and collects all problems, so a steering file
//! can be fixed in one pass:
//!
//! 1. **Non-empty chain**: at least one active processor
//! 2. **Unique names**: active processor names are unique
//! 3. **Types present**: every active processor names a plugin type
//! 4. **Condition syntax**: every condition parses
//!
//! Whether a type is actually registered is only known once plugin modules
//! are loaded, so that check is left to `Scheduler::init`.

use std::collections::HashSet;

use crate::conditions::Condition;
use crate::config::Config;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    DuplicateProcessorName, MalformedCondition, ValidationCompleted,
};
use crate::observability::messages::StructuredLog;

/// Validate a configuration, returning every problem found.
///
/// # Example
/// ```
/// use the_chainwood::config::{validate_config, Config, ProcessorConfig};
/// use the_chainwood::errors::ValidationError;
///
/// let cfg = Config {
///     processors: vec![
///         ProcessorConfig::new("monitor", "StatusMonitor"),
///         ProcessorConfig::new("monitor", "StatusMonitor"),
///     ],
///     ..Default::default()
/// };
///
/// let errors = validate_config(&cfg).unwrap_err();
/// assert_eq!(
///     errors,
///     vec![ValidationError::DuplicateProcessorName { name: "monitor".into() }]
/// );
/// ```
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut active_count = 0;

    for processor in cfg.active_processors() {
        active_count += 1;

        if !seen.insert(processor.name.as_str()) && reported.insert(processor.name.as_str()) {
            DuplicateProcessorName {
                name: &processor.name,
            }
            .log();
            errors.push(ValidationError::DuplicateProcessorName {
                name: processor.name.clone(),
            });
        }

        if processor.type_name.trim().is_empty() {
            errors.push(ValidationError::MissingProcessorType {
                name: processor.name.clone(),
            });
        }

        let expression = processor.condition_or_default();
        if let Err(error) = Condition::parse(expression) {
            let reason = error.to_string();
            MalformedCondition {
                name: &processor.name,
                expression,
                reason: &reason,
            }
            .log();
            errors.push(ValidationError::MalformedCondition {
                name: processor.name.clone(),
                expression: expression.to_string(),
                reason,
            });
        }
    }

    if active_count == 0 {
        errors.insert(0, ValidationError::EmptyChain);
    }

    ValidationCompleted {
        processor_count: active_count,
        error_count: errors.len(),
    }
    .log();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
