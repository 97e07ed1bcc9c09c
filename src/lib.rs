// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // built-in plugins + test doubles
pub mod conditions; // condition expressions + signal table
pub mod config;     // steering files + runtime builder
pub mod engine;     // scheduler, chain, runner
pub mod errors;     // error handling
pub mod model;      // run headers + events
pub mod observability;
pub mod plugins;    // plugin registry + native modules
pub mod seeds;      // per-event random seeds
pub mod traits;     // unified abstractions
