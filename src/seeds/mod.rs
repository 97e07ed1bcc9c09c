// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reproducible per-event random seeds.
//!
//! Every processor that needs randomness registers with the
//! [`SeedDistributor`] during `init`. Before each event the distributor is
//! refreshed with the event's run and event numbers, and each consumer can then
//! ask for its seed. The seed depends only on the global seed, the run number,
//! the event number and the consumer's name, so reruns, reordered chains and
//! jobs that start in the middle of a file all see identical seeds.

mod distributor;
mod hash;

pub use distributor::{SeedDistributor, SeedSnapshot};
pub use hash::{event_hash, identity_hash, jenkins_hash};

use crate::errors::SeedError;

/// Read access to per-event seeds, from the live distributor or a snapshot.
pub trait SeedLookup {
    fn seed_for(&self, consumer: &str) -> Result<u32, SeedError>;
}
