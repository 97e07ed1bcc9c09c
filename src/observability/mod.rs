// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every operational log line in The Chainwood is a small message struct with a
//! `Display` implementation and a [`messages::StructuredLog`] implementation that
//! emits the line at its documented level with structured fields attached.
//! Keeping the wording in one place means call sites never carry magic strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::scheduler` - chain assembly, per-event control flow, end-of-job report
//! * `messages::plugin` - plugin registration, lookups and native module loading
//! * `messages::conditions` - condition registration and signal publication
//! * `messages::seeds` - seed registry lifecycle
//! * `messages::runner` - job lifecycle around the data source
//! * `messages::monitor` - progress lines of the built-in status monitor
//! * `messages::validation` - steering file validation
//!
//! # Usage
//!
//! ```rust
//! use the_chainwood::observability::messages::StructuredLog;
//! use the_chainwood::observability::messages::plugin::PluginNotFound;
//!
//! PluginNotFound {
//!     kind: "processor",
//!     name: "MissingProcessor",
//! }
//! .log();
//! ```
//!
//! The binary installs a `tracing-subscriber` formatter; library code only emits.

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the process-wide fmt subscriber, honouring `RUST_LOG`.
///
/// Falls back to `default_directive` when `RUST_LOG` is unset or invalid.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
