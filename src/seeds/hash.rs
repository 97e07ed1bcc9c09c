// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Jenkins one-at-a-time hash over `bytes`, continuing from `state`.
///
/// Feeding the output of one call as the `state` of the next chains several
/// values into one hash; the order of the calls matters.
pub fn jenkins_hash(bytes: &[u8], state: u32) -> u32 {
    let mut hash = state;
    for byte in bytes {
        hash = hash.wrapping_add(u32::from(*byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

/// Generator seed for one event: hash the event number, then the run number,
/// then the global seed.
pub fn event_hash(global_seed: u32, run_number: u32, event_number: u32) -> u32 {
    let hash = jenkins_hash(&event_number.to_le_bytes(), 0);
    let hash = jenkins_hash(&run_number.to_le_bytes(), hash);
    jenkins_hash(&global_seed.to_le_bytes(), hash)
}

/// Stable hash of a consumer's identity
pub fn identity_hash(consumer: &str) -> u32 {
    jenkins_hash(consumer.as_bytes(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jenkins_known_values() {
        // Reference values for the one-at-a-time hash.
        assert_eq!(jenkins_hash(b"a", 0), 0xca2e_9442);
        assert_eq!(
            jenkins_hash(b"The quick brown fox jumps over the lazy dog", 0),
            0x519e_91f5
        );
    }

    #[test]
    fn test_event_hash_depends_on_order_of_inputs() {
        assert_ne!(event_hash(1, 2, 3), event_hash(1, 3, 2));
        assert_ne!(event_hash(1, 2, 3), event_hash(3, 2, 1));
        assert_eq!(event_hash(1, 2, 3), event_hash(1, 2, 3));
    }

    #[test]
    fn test_event_hash_chains_event_then_run_then_global() {
        let expected = jenkins_hash(
            &7u32.to_le_bytes(),
            jenkins_hash(&5u32.to_le_bytes(), jenkins_hash(&9u32.to_le_bytes(), 0)),
        );
        assert_eq!(event_hash(7, 5, 9), expected);
    }
}
