// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Misuse of the seed registry. Every variant names the consumer involved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("Cannot register '{consumer}' for random seeds: the first event has already been processed")]
    RegistrationClosed { consumer: String },

    #[error("'{consumer}' is already registered for random seeds")]
    AlreadyRegistered { consumer: String },

    #[error("'{consumer}' never registered for random seeds")]
    UnknownConsumer { consumer: String },
}
