//! Probe sequences for open addressing

use std::{fmt, str::FromStr};

use crate::TableError;

/// Collision resolution strategy, fixed when a table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProbeMethod {
    /// `idx = (h + i) mod size`
    #[default]
    Linear,
    /// `idx = (h + i + i^2) mod size`
    Quadratic,
}

impl ProbeMethod {
    /// Returns the slot index visited on probe `attempt` for a key hashing to `hash`.
    ///
    /// `capacity` must be a power of two. All arithmetic wraps in machine words, which
    /// is exact modulo any power of two that fits in `usize`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(self, hash: u64, attempt: usize, capacity: usize) -> usize {
        let offset = match self {
            Self::Linear => attempt,
            Self::Quadratic => attempt.wrapping_add(attempt.wrapping_mul(attempt)),
        };
        // Truncating keeps the low bits, and only those survive the mask.
        (hash as usize).wrapping_add(offset) & capacity.wrapping_sub(1)
    }

    /// Returns the full probe sequence for `hash`: one index per attempt `0..capacity`.
    #[must_use]
    pub fn sequence(self, hash: u64, capacity: usize) -> ProbeSequence {
        ProbeSequence { method: self, hash, capacity, attempt: 0 }
    }

    /// Lowercase name of the method
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeMethod {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("linear") {
            Ok(Self::Linear)
        } else if s.eq_ignore_ascii_case("quadratic") {
            Ok(Self::Quadratic)
        } else {
            Err(TableError::UnknownMethod(s.to_string()))
        }
    }
}

/// Iterator over the slot indices a key visits, bounded by the table capacity
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Strategy producing the offsets
    method: ProbeMethod,
    /// Hash of the probed key
    hash: u64,
    /// Table capacity, a power of two
    capacity: usize,
    /// Next attempt number
    attempt: usize,
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.capacity {
            return None;
        }
        let index = self.method.index(self.hash, self.attempt, self.capacity);
        self.attempt = self.attempt.saturating_add(1);
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity.saturating_sub(self.attempt);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_sequence() {
        let seq: Vec<usize> = ProbeMethod::Linear.sequence(14, 16).take(4).collect();
        assert_eq!(seq, vec![14, 15, 0, 1]);
    }

    #[test]
    fn test_quadratic_offsets() {
        for h in [0_u64, 5, 13, 1_000_003] {
            let seq: Vec<usize> = ProbeMethod::Quadratic.sequence(h, 16).take(4).collect();
            let h = usize::try_from(h).unwrap_or_default();
            assert_eq!(seq, vec![h % 16, (h + 2) % 16, (h + 6) % 16, (h + 12) % 16]);
        }
    }

    #[test]
    fn test_large_hash_wraps() {
        // u64::MAX is congruent to 15 modulo 16
        assert_eq!(ProbeMethod::Linear.index(u64::MAX, 0, 16), 15);
        assert_eq!(ProbeMethod::Linear.index(u64::MAX, 1, 16), 0);
        assert_eq!(ProbeMethod::Quadratic.index(u64::MAX, 1, 16), 1);
    }

    #[test]
    fn test_sequence_length_matches_capacity() {
        assert_eq!(ProbeMethod::Linear.sequence(7, 32).len(), 32);
        assert_eq!(ProbeMethod::Quadratic.sequence(7, 64).count(), 64);
    }

    #[test]
    fn test_linear_visits_every_slot() {
        let mut seen: Vec<usize> = ProbeMethod::Linear.sequence(9, 16).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_quadratic_visits_half_the_slots() {
        // i + i^2 is always even, so only slots of the hash's parity are reachable
        let mut seen: Vec<usize> = ProbeMethod::Quadratic.sequence(3, 16).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![1, 3, 5, 7, 9, 11, 13, 15]);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("linear".parse::<ProbeMethod>().ok(), Some(ProbeMethod::Linear));
        assert_eq!("Quadratic".parse::<ProbeMethod>().ok(), Some(ProbeMethod::Quadratic));
        assert!(matches!("cubic".parse::<ProbeMethod>(), Err(TableError::UnknownMethod(name)) if name == "cubic"));
        assert_eq!(ProbeMethod::Quadratic.to_string(), "quadratic");
        assert_eq!(ProbeMethod::default(), ProbeMethod::Linear);
    }
}
