//! Id generation for rows, columns and blocks.
//!
//! Ids only need to be collision-free within one conversion. The production
//! source mixes a time seed through a splitmix-style scrambler to keep tokens
//! opaque; tests inject [`SequentialIds`] for fully deterministic output.

use crate::util::time_seed_nanos;

/// Source of process-unique id tokens.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Default token generator: time-seeded, opaque 16-hex-digit tokens.
pub struct TokenIds {
    state: u64,
}

impl TokenIds {
    pub fn new() -> Self {
        Self {
            state: time_seed_nanos() | 1,
        }
    }
}

impl Default for TokenIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for TokenIds {
    fn next_id(&mut self) -> String {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut x = self.state;
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
        x ^= x >> 31;
        format!("{x:016x}")
    }
}

/// Monotonic ids (`id-1`, `id-2`, …) for deterministic conversions.
#[derive(Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("id-{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ids_are_unique_within_a_run() {
        let mut ids = TokenIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn sequential_ids_are_deterministic() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "id-1");
        assert_eq!(ids.next_id(), "id-2");
    }
}
