// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod context;
pub mod processor;
pub mod provider;

pub use context::{EventContext, InitContext};
pub use processor::{EventModifier, HookResult, Processor, StepOutcome};
pub use provider::{DataSource, GeometryProvider};
