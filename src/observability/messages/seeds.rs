// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the seed registry.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A consumer joined the seed registry.
///
/// # Log Level
/// `debug!` - Detailed lifecycle information
pub struct SeedConsumerRegistered<'a> {
    pub consumer: &'a str,
    pub initial_seed: u32,
}

impl Display for SeedConsumerRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' registered for random seeds (initial seed {})",
            self.consumer, self.initial_seed
        )
    }
}

impl StructuredLog for SeedConsumerRegistered<'_> {
    fn log(&self) {
        tracing::debug!(consumer = self.consumer, initial_seed = self.initial_seed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("seed_consumer", span_name = name, consumer = self.consumer)
    }
}

/// The first refresh closed the registry to new consumers.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SeedRegistryClosed {
    pub consumer_count: usize,
    pub global_seed: u32,
}

impl Display for SeedRegistryClosed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Seed registry closed with {} consumers (global seed {})",
            self.consumer_count, self.global_seed
        )
    }
}

impl StructuredLog for SeedRegistryClosed {
    fn log(&self) {
        tracing::info!(
            consumer_count = self.consumer_count,
            global_seed = self.global_seed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "seed_registry_closed",
            span_name = name,
            consumer_count = self.consumer_count,
            global_seed = self.global_seed,
        )
    }
}
