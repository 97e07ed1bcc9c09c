// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::mem::ManuallyDrop;
use std::path::{Path, PathBuf};

use libloading::Library;

use super::registrar::PluginRegistrar;
use crate::errors::PluginError;
use crate::observability::messages::plugin::{LibraryRetained, LibraryWithoutEntryPoint};
use crate::observability::messages::StructuredLog;

/// Bumped whenever the registrar or plugin traits change shape.
pub const PLUGIN_ABI_VERSION: u32 = 1;

pub(crate) const REGISTER_SYMBOL: &str = "chainwood_register_plugins";
pub(crate) const ABI_VERSION_SYMBOL: &str = "chainwood_plugin_abi_version";

type RegisterFn = fn(&mut PluginRegistrar);
type AbiVersionFn = extern "C" fn() -> u32;

/// What happens to native modules when the last reference goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryRetention {
    /// Unmap the module.
    #[default]
    Unload,
    /// Keep the module mapped until the process exits.
    Leak,
}

/// Owns one loaded native module.
pub struct NativeLibrary {
    basename: String,
    path: PathBuf,
    library: ManuallyDrop<Library>,
    retention: LibraryRetention,
}

impl NativeLibrary {
    /// Final path component, used to detect duplicate loads.
    pub fn basename_of(path: &str) -> Result<String, PluginError> {
        Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| PluginError::InvalidLibraryPath(path.to_string()))
    }

    pub(crate) fn open(path: &str, retention: LibraryRetention) -> Result<Self, PluginError> {
        let basename = Self::basename_of(path)?;
        // SAFETY: loading runs the module's initializers; plugin modules are
        // trusted code chosen by whoever configures the job.
        let library = unsafe { Library::new(path) }.map_err(|source| PluginError::LoadFailed {
            path: path.to_string(),
            source,
        })?;

        Ok(Self {
            basename,
            path: PathBuf::from(path),
            library: ManuallyDrop::new(library),
            retention,
        })
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the module's registration entry point.
    ///
    /// Returns `Ok(None)` when the module exports no entry point.
    pub(crate) fn register_into(
        &self,
        registrar: &mut PluginRegistrar,
    ) -> Result<Option<usize>, PluginError> {
        // SAFETY: the symbol type matches what `export_plugins!` emits.
        let register: RegisterFn = match unsafe {
            self.library
                .get::<RegisterFn>(REGISTER_SYMBOL.as_bytes())
        } {
            Ok(symbol) => *symbol,
            Err(_) => {
                LibraryWithoutEntryPoint {
                    path: &self.path.to_string_lossy(),
                    symbol: REGISTER_SYMBOL,
                }
                .log();
                return Ok(None);
            }
        };

        let found = self.abi_version().unwrap_or(0);
        if found != PLUGIN_ABI_VERSION {
            return Err(PluginError::AbiMismatch {
                path: self.path.to_string_lossy().into_owned(),
                found,
                expected: PLUGIN_ABI_VERSION,
            });
        }

        let before = registrar.len();
        register(registrar);
        Ok(Some(registrar.len() - before))
    }

    fn abi_version(&self) -> Option<u32> {
        // SAFETY: the symbol type matches what `export_plugins!` emits.
        unsafe {
            self.library
                .get::<AbiVersionFn>(ABI_VERSION_SYMBOL.as_bytes())
                .ok()
                .map(|symbol| symbol())
        }
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        match self.retention {
            LibraryRetention::Unload => {
                // SAFETY: dropped exactly once, here; every factory and
                // instance from this module holds an Arc to `self`.
                unsafe { ManuallyDrop::drop(&mut self.library) }
            }
            LibraryRetention::Leak => LibraryRetained {
                basename: &self.basename,
            }
            .log(),
        }
    }
}
