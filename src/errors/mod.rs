// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod condition;
mod config;
mod plugin;
mod scheduler;
mod seed;

pub use condition::ConditionError;
pub use config::{ConfigError, ValidationError};
pub use plugin::PluginError;
pub use scheduler::{ChainError, SchedulerError};
pub use seed::SeedError;
