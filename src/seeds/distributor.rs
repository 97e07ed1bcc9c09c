// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::hash::{event_hash, identity_hash};
use super::SeedLookup;
use crate::errors::SeedError;
use crate::observability::messages::seeds::{SeedConsumerRegistered, SeedRegistryClosed};
use crate::observability::messages::StructuredLog;

/// Hands every registered consumer a reproducible seed per (run, event).
///
/// The registry is *open* until the first [`refresh`](Self::refresh); after
/// that no new consumers are accepted. Each refresh reseeds a fresh generator
/// per consumer from the event hash and the consumer's identity, so a
/// consumer's seed never depends on who else is registered or in which order.
pub struct SeedDistributor {
    global_seed: u32,
    closed: bool,
    generator: ChaCha8Rng,
    seeds: HashMap<String, u32>,
    current_event: Option<(u32, u32)>,
}

impl SeedDistributor {
    pub fn new(global_seed: u32) -> Self {
        Self {
            global_seed,
            closed: false,
            generator: ChaCha8Rng::seed_from_u64(u64::from(global_seed)),
            seeds: HashMap::new(),
            current_event: None,
        }
    }

    /// Register a consumer and give it an initial seed from the generator.
    pub fn add_entry(&mut self, consumer: &str) -> Result<u32, SeedError> {
        if self.closed {
            return Err(SeedError::RegistrationClosed {
                consumer: consumer.to_string(),
            });
        }
        if self.seeds.contains_key(consumer) {
            return Err(SeedError::AlreadyRegistered {
                consumer: consumer.to_string(),
            });
        }

        let initial_seed: u32 = self.generator.gen();
        self.seeds.insert(consumer.to_string(), initial_seed);
        SeedConsumerRegistered {
            consumer,
            initial_seed,
        }
        .log();
        Ok(initial_seed)
    }

    /// Refuse further registrations. Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            SeedRegistryClosed {
                consumer_count: self.seeds.len(),
                global_seed: self.global_seed,
            }
            .log();
        }
    }

    /// Recompute every consumer's seed for the given event.
    pub fn refresh(&mut self, run_number: u32, event_number: u32) {
        self.close();
        let base = event_hash(self.global_seed, run_number, event_number);
        for (consumer, seed) in self.seeds.iter_mut() {
            *seed = derive_seed(base, consumer);
        }
        self.current_event = Some((run_number, event_number));
    }

    pub fn get_seed(&self, consumer: &str) -> Result<u32, SeedError> {
        self.seeds
            .get(consumer)
            .copied()
            .ok_or_else(|| SeedError::UnknownConsumer {
                consumer: consumer.to_string(),
            })
    }

    /// Seeds every consumer would receive for (run, event), without touching
    /// the distributor's own state.
    pub fn snapshot(&self, run_number: u32, event_number: u32) -> SeedSnapshot {
        let base = event_hash(self.global_seed, run_number, event_number);
        SeedSnapshot {
            run_number,
            event_number,
            seeds: self
                .seeds
                .keys()
                .map(|consumer| (consumer.clone(), derive_seed(base, consumer)))
                .collect(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn global_seed(&self) -> u32 {
        self.global_seed
    }

    /// The (run, event) of the last refresh
    pub fn current_event(&self) -> Option<(u32, u32)> {
        self.current_event
    }

    pub fn consumer_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_registered(&self, consumer: &str) -> bool {
        self.seeds.contains_key(consumer)
    }
}

impl SeedLookup for SeedDistributor {
    fn seed_for(&self, consumer: &str) -> Result<u32, SeedError> {
        self.get_seed(consumer)
    }
}

impl fmt::Debug for SeedDistributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedDistributor")
            .field("global_seed", &self.global_seed)
            .field("closed", &self.closed)
            .field("consumer_count", &self.seeds.len())
            .field("current_event", &self.current_event)
            .finish()
    }
}

fn derive_seed(event_seed: u32, consumer: &str) -> u32 {
    let stream = (u64::from(event_seed) << 32) | u64::from(identity_hash(consumer));
    ChaCha8Rng::seed_from_u64(stream).gen()
}

/// Frozen seeds for one (run, event), owned by a single in-flight event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSnapshot {
    pub run_number: u32,
    pub event_number: u32,
    seeds: HashMap<String, u32>,
}

impl SeedSnapshot {
    pub fn get(&self, consumer: &str) -> Option<u32> {
        self.seeds.get(consumer).copied()
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl SeedLookup for SeedSnapshot {
    fn seed_for(&self, consumer: &str) -> Result<u32, SeedError> {
        self.get(consumer).ok_or_else(|| SeedError::UnknownConsumer {
            consumer: consumer.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOBAL_SEED: u32 = 1_234_567_890;

    fn distributor_with(consumers: &[&str]) -> SeedDistributor {
        let mut seeds = SeedDistributor::new(GLOBAL_SEED);
        for consumer in consumers {
            seeds.add_entry(consumer).unwrap();
        }
        seeds
    }

    #[test]
    fn test_seed_is_independent_of_other_consumers_and_order() {
        let mut alone = distributor_with(&["Smearing"]);
        let mut crowded = distributor_with(&["Digitizer", "Overlay", "Smearing", "Tracking"]);
        let mut reversed = distributor_with(&["Tracking", "Smearing", "Overlay", "Digitizer"]);

        for (run, event) in [(0, 0), (1, 17), (42, 100_000)] {
            alone.refresh(run, event);
            crowded.refresh(run, event);
            reversed.refresh(run, event);

            let expected = alone.get_seed("Smearing").unwrap();
            assert_eq!(crowded.get_seed("Smearing").unwrap(), expected);
            assert_eq!(reversed.get_seed("Smearing").unwrap(), expected);
            assert_eq!(
                crowded.get_seed("Overlay").unwrap(),
                reversed.get_seed("Overlay").unwrap()
            );
        }
    }

    #[test]
    fn test_seed_is_independent_of_refresh_history() {
        let mut fresh = distributor_with(&["Smearing"]);
        fresh.refresh(3, 9);
        let expected = fresh.get_seed("Smearing").unwrap();

        let mut busy = distributor_with(&["Smearing"]);
        for event in 0..50 {
            busy.refresh(1, event);
        }
        busy.refresh(3, 9);

        assert_eq!(busy.get_seed("Smearing").unwrap(), expected);
    }

    #[test]
    fn test_seeds_change_between_events_and_consumers() {
        let mut seeds = distributor_with(&["A", "B"]);

        seeds.refresh(1, 1);
        let a1 = seeds.get_seed("A").unwrap();
        let b1 = seeds.get_seed("B").unwrap();
        seeds.refresh(1, 2);
        let a2 = seeds.get_seed("A").unwrap();

        assert_ne!(a1, b1);
        assert_ne!(a1, a2);
    }

    #[test]
    fn test_global_seed_changes_every_seed() {
        let mut first = SeedDistributor::new(1);
        let mut second = SeedDistributor::new(2);
        first.add_entry("A").unwrap();
        second.add_entry("A").unwrap();

        first.refresh(5, 5);
        second.refresh(5, 5);

        assert_ne!(first.get_seed("A").unwrap(), second.get_seed("A").unwrap());
    }

    #[test]
    fn test_registration_closes_on_first_refresh() {
        let mut seeds = distributor_with(&["A"]);
        assert!(!seeds.is_closed());

        seeds.refresh(0, 0);

        assert!(seeds.is_closed());
        assert_eq!(seeds.current_event(), Some((0, 0)));
        assert_eq!(
            seeds.add_entry("Late"),
            Err(SeedError::RegistrationClosed {
                consumer: "Late".to_string()
            })
        );
    }

    #[test]
    fn test_registry_misuse() {
        let mut seeds = distributor_with(&["A"]);

        assert_eq!(
            seeds.add_entry("A"),
            Err(SeedError::AlreadyRegistered {
                consumer: "A".to_string()
            })
        );
        assert_eq!(
            seeds.get_seed("Ghost"),
            Err(SeedError::UnknownConsumer {
                consumer: "Ghost".to_string()
            })
        );
    }

    #[test]
    fn test_initial_seeds_available_before_first_refresh() {
        let seeds = distributor_with(&["A", "B"]);
        assert!(seeds.get_seed("A").is_ok());
        assert!(seeds.get_seed("B").is_ok());
        assert_eq!(seeds.consumer_count(), 2);
    }

    #[test]
    fn test_snapshot_matches_refresh_without_mutating() {
        let mut seeds = distributor_with(&["A", "B"]);
        let snapshot = seeds.snapshot(7, 11);

        assert!(!seeds.is_closed());
        assert_eq!(seeds.current_event(), None);

        seeds.refresh(7, 11);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.seed_for("A"), seeds.get_seed("A"));
        assert_eq!(snapshot.seed_for("B"), seeds.get_seed("B"));
        assert!(snapshot.seed_for("C").is_err());
    }
}
