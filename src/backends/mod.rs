// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plugin implementations that live inside the crate.
//!
//! # Available Backends
//!
//! ## Local Backend
//! Built-in plugins registered under their type names:
//! - **Processors**: `StatusMonitor`, `RandomGate`, `EventSkipper`,
//!   `RunStopper` and the event modifier `EventTagger`
//! - **Geometry**: `EmptyGeometry`
//! - **Data source**: `CountingSource`, a synthetic run/event stream
//!
//! ## Stub Backend (Test-Only)
//! `RecordingProcessor` and `CallLog` record every hook call so the
//! scheduler and runner can be tested without real processors. Not
//! available in production builds.
//!
//! Plugins from native modules are not backends; they are loaded at
//! runtime through [`crate::plugins::PluginRegistry`].
//!
//! # Examples
//!
//! ```rust
//! use the_chainwood::backends::local::register_builtin_plugins;
//! use the_chainwood::plugins::{PluginKind, PluginRegistry};
//!
//! let registry = PluginRegistry::default();
//! register_builtin_plugins(&registry)?;
//! assert!(registry.is_registered(PluginKind::Processor, "RandomGate"));
//! # Ok::<(), the_chainwood::errors::PluginError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
