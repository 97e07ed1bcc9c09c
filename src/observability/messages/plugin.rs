// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the plugin registry and native module loading.
//!
//! This module contains message types for logging events related to:
//! * Plugin registration and duplicate handling
//! * Lookup misses on `create`
//! * Loading, rejecting and retaining native modules

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A factory was stored in the registry.
///
/// # Log Level
/// `debug!` - Detailed lifecycle information
pub struct PluginRegistered<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub origin: &'a str,
}

impl Display for PluginRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered {} plugin '{}' from {}",
            self.kind, self.name, self.origin
        )
    }
}

impl StructuredLog for PluginRegistered<'_> {
    fn log(&self) {
        tracing::debug!(kind = self.kind, name = self.name, origin = self.origin, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("plugin_registered", span_name = name, kind = self.kind, plugin = self.name)
    }
}

/// A second registration under an existing (kind, name) was dropped.
///
/// # Log Level
/// `warn!` - Unexpected but recoverable
pub struct DuplicatePluginIgnored<'a> {
    pub kind: &'a str,
    pub name: &'a str,
}

impl Display for DuplicatePluginIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} plugin '{}' already registered, keeping the first registration",
            self.kind, self.name
        )
    }
}

impl StructuredLog for DuplicatePluginIgnored<'_> {
    fn log(&self) {
        tracing::warn!(kind = self.kind, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("duplicate_plugin", span_name = name, kind = self.kind, plugin = self.name)
    }
}

/// `create` was asked for a plugin nobody registered.
///
/// # Log Level
/// `error!` - The caller decides whether this is fatal
///
/// # Example
/// ```
/// use the_chainwood::observability::messages::plugin::PluginNotFound;
///
/// let msg = PluginNotFound {
///     kind: "processor",
///     name: "TrackFinder",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct PluginNotFound<'a> {
    pub kind: &'a str,
    pub name: &'a str,
}

impl Display for PluginNotFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No {} plugin named '{}' is registered", self.kind, self.name)
    }
}

impl StructuredLog for PluginNotFound<'_> {
    fn log(&self) {
        tracing::error!(kind = self.kind, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("plugin_not_found", span_name = name, kind = self.kind, plugin = self.name)
    }
}

/// A native module was loaded and its plugins registered.
///
/// # Log Level
/// `info!` - Important operational event
pub struct LibraryLoaded<'a> {
    pub path: &'a str,
    pub basename: &'a str,
    pub plugin_count: usize,
}

impl Display for LibraryLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded library '{}' from '{}' ({} plugins)",
            self.basename, self.path, self.plugin_count
        )
    }
}

impl StructuredLog for LibraryLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            basename = self.basename,
            plugin_count = self.plugin_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("library_loaded", span_name = name, basename = self.basename)
    }
}

/// A native module could not be loaded; the rest of the batch is abandoned.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct LibraryLoadFailed<'a> {
    pub path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for LibraryLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to load library '{}': {}", self.path, self.error)
    }
}

impl StructuredLog for LibraryLoadFailed<'_> {
    fn log(&self) {
        tracing::error!(path = self.path, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("library_load_failed", span_name = name, path = self.path, error = %self.error)
    }
}

/// A loaded module does not export a registration entry point.
///
/// # Log Level
/// `warn!` - The module stays resident but contributes nothing
pub struct LibraryWithoutEntryPoint<'a> {
    pub path: &'a str,
    pub symbol: &'a str,
}

impl Display for LibraryWithoutEntryPoint<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Library '{}' does not export '{}', no plugins registered",
            self.path, self.symbol
        )
    }
}

impl StructuredLog for LibraryWithoutEntryPoint<'_> {
    fn log(&self) {
        tracing::warn!(path = self.path, symbol = self.symbol, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("library_without_entry_point", span_name = name, path = self.path)
    }
}

/// A module is being left resident instead of unloaded.
///
/// # Log Level
/// `debug!` - Detailed lifecycle information
pub struct LibraryRetained<'a> {
    pub basename: &'a str,
}

impl Display for LibraryRetained<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Leaving library '{}' resident at shutdown", self.basename)
    }
}

impl StructuredLog for LibraryRetained<'_> {
    fn log(&self) {
        tracing::debug!(basename = self.basename, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("library_retained", span_name = name, basename = self.basename)
    }
}
