// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod chain;
mod runner;
mod scheduler;
mod statistics;
mod whiteboard;


pub use chain::{ChainMember, ProcessorChain};
pub use runner::{JobRunner, JobSummary, RunnerOptions};
pub use scheduler::{Scheduler, SchedulerOptions, SchedulerState};
pub use statistics::{ProcessorReport, ProcessorTiming, RunReport, RunStatistics};
pub use whiteboard::{EventKey, EventSlot, Whiteboard};
