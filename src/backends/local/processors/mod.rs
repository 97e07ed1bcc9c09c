// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod event_skipper;
pub mod event_tagger;
pub mod random_gate;
pub mod run_stopper;
pub mod status_monitor;

pub use event_skipper::*;
pub use event_tagger::*;
pub use random_gate::*;
pub use run_stopper::*;
pub use status_monitor::*;
