// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Problems found while validating a steering configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The configuration defines no active processors
    EmptyChain,
    /// Two active processors share a name
    DuplicateProcessorName {
        /// The name used more than once
        name: String,
    },
    /// A processor entry has no plugin type
    MissingProcessorType {
        /// The processor without a type
        name: String,
    },
    /// A processor's condition expression cannot be parsed
    MalformedCondition {
        /// The processor carrying the condition
        name: String,
        /// The offending expression
        expression: String,
        /// What the parser rejected
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyChain => {
                write!(f, "No active processors configured")
            }
            ValidationError::DuplicateProcessorName { name } => {
                write!(f, "Duplicate processor name: '{}'", name)
            }
            ValidationError::MissingProcessorType { name } => {
                write!(f, "Processor '{}' has no type", name)
            }
            ValidationError::MalformedCondition {
                name,
                expression,
                reason,
            } => {
                write!(
                    f,
                    "Processor '{}' has a malformed condition '{}': {}",
                    name, expression, reason
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading a steering file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read steering file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML steering file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML steering file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported steering file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
