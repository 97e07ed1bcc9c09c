// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it with structured fields at the right level.
//!
//! # Organization
//!
//! * `scheduler` - chain assembly, skips, stop/rewind requests, end report
//! * `plugin` - registry and native module events
//! * `conditions` - condition registration and signal publication
//! * `seeds` - seed registry lifecycle
//! * `monitor` - progress output of the built-in status monitor
//! * `runner` - job lifecycle
//! * `validation` - steering file validation
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_chainwood::observability::messages::StructuredLog;
//! use the_chainwood::observability::messages::scheduler::SchedulerInitialized;
//!
//! let msg = SchedulerInitialized {
//!     processor_count: 5,
//!     modifier_count: 1,
//! };
//!
//! msg.log();
//! ```

pub mod conditions;
pub mod monitor;
pub mod plugin;
pub mod runner;
pub mod scheduler;
pub mod seeds;
pub mod validation;

use std::fmt::Display;
use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
