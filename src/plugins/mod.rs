// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plugin registry and native module loading.
//!
//! Every processor, geometry provider and data source is created through a
//! [`PluginRegistry`]: a map from (kind, name) to a zero-argument factory.
//! Built-in plugins are installed directly; everything else comes from
//! native shared modules named in an environment variable and loaded at
//! startup.
//!
//! # Writing a plugin module
//!
//! A module is a `cdylib` that depends on this crate and exports its
//! registration function with [`export_plugins!`](crate::export_plugins):
//!
//! ```rust,ignore
//! use the_chainwood::plugins::PluginRegistrar;
//!
//! fn register(registrar: &mut PluginRegistrar) {
//!     registrar.register_processor("MyDigitizer", || Box::new(MyDigitizer::default()));
//! }
//!
//! the_chainwood::export_plugins!(register);
//! ```
//!
//! The module must be built with the same compiler and crate version as the
//! host; the exported ABI version is checked on load.
//!
//! # Lifetime of native code
//!
//! Factories and instances created from a module keep an `Arc` to the module's
//! [`NativeLibrary`] guard, so the code they point into stays mapped until the
//! last of them is dropped. With [`LibraryRetention::Leak`] the module is never
//! unmapped at all.

mod kind;
mod library;
mod registrar;
mod registry;

pub use kind::{Plugin, PluginFactory, PluginHandle, PluginKind};
pub use library::{LibraryRetention, NativeLibrary, PLUGIN_ABI_VERSION};
pub use registrar::PluginRegistrar;
pub use registry::PluginRegistry;

/// Export a module's plugin registration function under the symbols the
/// registry looks for.
#[macro_export]
macro_rules! export_plugins {
    ($register:path) => {
        #[no_mangle]
        pub fn chainwood_register_plugins(registrar: &mut $crate::plugins::PluginRegistrar) {
            $register(registrar);
        }

        #[no_mangle]
        pub extern "C" fn chainwood_plugin_abi_version() -> u32 {
            $crate::plugins::PLUGIN_ABI_VERSION
        }
    };
}
