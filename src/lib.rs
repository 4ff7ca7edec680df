//! # Probing Hash Table
//!
//! A hash table using open addressing with two selectable probing strategies and
//! collision-driven growth.
//!
//! - [`ProbeMethod::Linear`] visits `(h + i) mod size`
//! - [`ProbeMethod::Quadratic`] visits `(h + i + i^2) mod size`
//!
//! Every probe that lands on a foreign entry is counted as a collision. Once the count
//! goes past the table's collision threshold (50 by default), the next insert doubles the
//! capacity, replays every live entry and starts counting from zero again. An insert whose
//! probe sequence is exhausted also doubles the table and retries once.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probing::{ProbeMethod, ProbingHashTable};
//!
//! let mut table = ProbingHashTable::new(ProbeMethod::Linear);
//!
//! assert!(table.insert("apple".to_string(), 100));
//! assert!(table.insert("banana".to_string(), 200));
//! assert!(table.insert("cherry".to_string(), 300));
//!
//! assert_eq!(table.search("banana"), Some(&200));
//! assert_eq!(table.search("durian"), None);
//! assert_eq!(table.capacity(), 16);
//!
//! // Overwriting keeps a single entry per key
//! table.insert("banana".to_string(), 250);
//! assert_eq!(table.search("banana"), Some(&250));
//! assert_eq!(table.len(), 3);
//!
//! // Removal leaves a tombstone so longer probe chains stay intact
//! assert_eq!(table.remove("apple"), Some(100));
//! assert_eq!(table.search("apple"), None);
//! ```
//!
//! ## Eager Resizing
//!
//! ```rust
//! use probing::{ProbeMethod, ProbingHashTable};
//!
//! // A lower threshold trades memory for shorter probe chains
//! let mut table = ProbingHashTable::with_threshold(ProbeMethod::Quadratic, 4);
//! for i in 0..100 {
//!     table.insert(i, i * 10);
//! }
//!
//! assert!(table.capacity().is_power_of_two());
//! assert!(table.resize_count() > 0);
//! assert_eq!(table.search(&42), Some(&420));
//! ```

/// Errors reported by the table
mod error;
/// Probe sequences for the supported strategies
mod probe;
/// Module implementing the open-addressing hash table
mod probing_table;
/// Utility traits for the hash table
mod utils;

pub use error::TableError;
pub use probe::{ProbeMethod, ProbeSequence};
pub use probing_table::{
    DEFAULT_COLLISION_THRESHOLD, DefaultHashBuilder, INITIAL_CAPACITY, Iter, ProbingHashTable,
    TableStats,
};
pub use utils::HashMapExtensions;
