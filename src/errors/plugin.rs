// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for plugin registration and native module loading.

use crate::plugins::PluginKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    /// A (kind, name) pair is already taken and duplicates were not allowed.
    #[error("{kind} plugin '{name}' is already registered")]
    DuplicatePlugin { kind: PluginKind, name: String },

    /// A module with the same basename is already resident.
    #[error("Library '{basename}' is already loaded (requested from '{path}')")]
    DuplicateLibrary { basename: String, path: String },

    /// The module list variable is set but is not valid UTF-8.
    #[error("Library list in '{0}' is not valid UTF-8")]
    InvalidLibraryList(String),

    /// The path has no usable file name.
    #[error("Cannot derive a library name from '{0}'")]
    InvalidLibraryPath(String),

    /// The dynamic loader rejected the module.
    #[error("Failed to load library '{path}': {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: libloading::Error,
    },

    /// The module was built against a different plugin interface.
    #[error("Library '{path}' exports plugin ABI version {found}, expected {expected}")]
    AbiMismatch {
        path: String,
        found: u32,
        expected: u32,
    },
}
