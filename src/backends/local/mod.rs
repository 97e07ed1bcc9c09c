// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod geometry;
pub mod processors;
pub mod sources;

pub use factory::LocalPluginFactory;
pub use geometry::EmptyGeometry;
pub use processors::*;
pub use sources::CountingSource;

use crate::errors::PluginError;
use crate::plugins::PluginRegistry;

/// Install the built-in plugins into `registry`.
pub fn register_builtin_plugins(registry: &PluginRegistry) -> Result<usize, PluginError> {
    LocalPluginFactory::install(registry)
}
