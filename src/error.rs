//! Errors reported by [`ProbingHashTable`](crate::ProbingHashTable) and [`ProbeMethod`](crate::ProbeMethod)

use std::collections::TryReserveError;

use thiserror::Error;

/// Recoverable failures of the table.
///
/// A missing key is not an error: lookups return `Option`. A broken probing invariant
/// (a post-resize placement that finds no room) is a panic, not a variant.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TableError {
    /// The slot array for the enlarged table could not be allocated
    #[error("failed to allocate {capacity} slots for resize")]
    Allocation {
        /// Slot count that was requested
        capacity: usize,
        /// Allocator failure
        #[source]
        source: TryReserveError,
    },
    /// Doubling the current capacity would overflow `usize`
    #[error("cannot grow table beyond {capacity} slots")]
    CapacityOverflow {
        /// Capacity at the time of the failed resize
        capacity: usize,
    },
    /// A probing method name was not recognised
    #[error("unknown probing method `{0}`, expected `linear` or `quadratic`")]
    UnknownMethod(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TableError::CapacityOverflow { capacity: 16 };
        assert_eq!(err.to_string(), "cannot grow table beyond 16 slots");

        let err = TableError::UnknownMethod("cubic".to_string());
        assert_eq!(err.to_string(), "unknown probing method `cubic`, expected `linear` or `quadratic`");
    }

    #[test]
    #[allow(clippy::panic)]
    fn test_allocation_error_keeps_source() {
        use std::error::Error as _;

        let mut probe: Vec<u64> = Vec::new();
        let Err(source) = probe.try_reserve_exact(usize::MAX) else {
            panic!("reserving usize::MAX elements must fail");
        };
        let err = TableError::Allocation { capacity: usize::MAX, source };

        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to allocate"));
    }
}
