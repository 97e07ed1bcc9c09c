// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-event contexts for events in flight at the same time.
//!
//! The chain, the named conditions and the plugin registry are fixed after
//! `init` and can be shared. What changes per event is the signal table and
//! the seeds; the whiteboard gives every live event its own copy of both,
//! keyed by (run, event). Slots are created and removed under one write
//! lock; lookups only take the read lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::conditions::SignalTable;
use crate::errors::SchedulerError;
use crate::model::Event;
use crate::seeds::SeedSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub run_number: u32,
    pub event_number: u32,
}

impl EventKey {
    pub fn new(run_number: u32, event_number: u32) -> Self {
        Self {
            run_number,
            event_number,
        }
    }
}

impl From<&Event> for EventKey {
    fn from(event: &Event) -> Self {
        Self::new(event.run_number, event.event_number)
    }
}

/// Private state of one event in flight.
#[derive(Debug)]
pub struct EventSlot {
    key: EventKey,
    signals: Mutex<SignalTable>,
    seeds: SeedSnapshot,
}

impl EventSlot {
    pub fn key(&self) -> EventKey {
        self.key
    }

    pub fn seeds(&self) -> &SeedSnapshot {
        &self.seeds
    }

    pub fn signals(&self) -> MutexGuard<'_, SignalTable> {
        self.signals.lock()
    }

    pub fn signal(&self, key: &str) -> Option<bool> {
        self.signals.lock().get(key)
    }
}

#[derive(Debug, Default)]
pub struct Whiteboard {
    slots: RwLock<HashMap<EventKey, Arc<EventSlot>>>,
}

impl Whiteboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the slot for an event, with a fresh signal table.
    pub fn open(&self, seeds: SeedSnapshot) -> Result<Arc<EventSlot>, SchedulerError> {
        let key = EventKey::new(seeds.run_number, seeds.event_number);
        let mut slots = self.slots.write();
        if slots.contains_key(&key) {
            return Err(SchedulerError::EventInFlight {
                run: key.run_number,
                event: key.event_number,
            });
        }

        let slot = Arc::new(EventSlot {
            key,
            signals: Mutex::new(SignalTable::new()),
            seeds,
        });
        slots.insert(key, Arc::clone(&slot));
        Ok(slot)
    }

    pub fn get(&self, key: EventKey) -> Option<Arc<EventSlot>> {
        self.slots.read().get(&key).cloned()
    }

    /// Remove the slot; holders of the `Arc` keep their copy.
    pub fn close(&self, key: EventKey) -> Option<Arc<EventSlot>> {
        self.slots.write().remove(&key)
    }

    pub fn in_flight(&self) -> usize {
        self.slots.read().len()
    }

    pub fn keys(&self) -> Vec<EventKey> {
        let mut keys: Vec<EventKey> = self.slots.read().keys().copied().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::SeedDistributor;
    use std::thread;

    fn distributor() -> SeedDistributor {
        let mut seeds = SeedDistributor::new(5);
        seeds.add_entry("Smearing").unwrap();
        seeds
    }

    #[test]
    fn test_open_get_close() {
        let seeds = distributor();
        let board = Whiteboard::new();
        let key = EventKey::new(1, 2);

        let slot = board.open(seeds.snapshot(1, 2)).unwrap();
        assert_eq!(slot.key(), key);
        assert_eq!(board.in_flight(), 1);
        assert!(board.get(key).is_some());

        assert!(board.close(key).is_some());
        assert!(board.get(key).is_none());
        assert!(board.close(key).is_none());
    }

    #[test]
    fn test_same_event_cannot_be_opened_twice() {
        let seeds = distributor();
        let board = Whiteboard::new();
        board.open(seeds.snapshot(1, 2)).unwrap();

        let result = board.open(seeds.snapshot(1, 2));
        assert!(matches!(
            result,
            Err(SchedulerError::EventInFlight { run: 1, event: 2 })
        ));
    }

    #[test]
    fn test_slots_are_private_per_event() {
        let seeds = distributor();
        let board = Whiteboard::new();
        let first = board.open(seeds.snapshot(1, 1)).unwrap();
        let second = board.open(seeds.snapshot(1, 2)).unwrap();

        first.signals().set("Gate", true);

        assert_eq!(first.signal("Gate"), Some(true));
        assert_eq!(second.signal("Gate"), None);
        assert_ne!(
            first.seeds().get("Smearing"),
            second.seeds().get("Smearing")
        );
    }

    #[test]
    fn test_concurrent_events() {
        let seeds = distributor();
        let board = Arc::new(Whiteboard::new());
        let snapshots: Vec<SeedSnapshot> = (0..8).map(|event| seeds.snapshot(3, event)).collect();

        let handles: Vec<_> = snapshots
            .into_iter()
            .map(|snapshot| {
                let board = Arc::clone(&board);
                thread::spawn(move || {
                    let event = snapshot.event_number;
                    let slot = board.open(snapshot).unwrap();
                    slot.signals().set("Even", event % 2 == 0);
                    let key = slot.key();
                    assert_eq!(
                        board.get(key).unwrap().signal("Even"),
                        Some(event % 2 == 0)
                    );
                    key
                })
            })
            .collect();

        let keys: Vec<EventKey> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(board.in_flight(), 8);
        assert_eq!(board.keys().len(), 8);

        for key in keys {
            board.close(key);
        }
        assert_eq!(board.in_flight(), 0);
    }
}
