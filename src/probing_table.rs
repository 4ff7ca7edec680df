use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, BuildHasherDefault, Hash},
    mem,
};

use log::{debug, trace, warn};

use crate::{ProbeMethod, TableError};

/// Number of slots a freshly built table starts with
pub const INITIAL_CAPACITY: usize = 16;

/// Collision threshold (M) used when none is given
pub const DEFAULT_COLLISION_THRESHOLD: usize = 50;

/// Deterministic hasher builder used unless another one is supplied
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// A single position in the slot array
#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// Never held an entry; terminates every probe
    Empty,
    /// Held an entry that was removed; probes continue past it
    Tombstone,
    /// Holds a live entry
    Occupied {
        /// The key of the entry
        key: K,
        /// The value associated with the key
        value: V,
    },
}

/// Outcome of walking a key's probe sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index
    Found(usize),
    /// The key is absent and may be placed at this index
    Vacant(usize),
    /// Every attempt hit a non-matching live entry
    Exhausted,
}

/// Why a resize was started, for logging
#[derive(Debug, Clone, Copy)]
enum ResizeReason {
    /// `total_collisions` went past the configured threshold
    CollisionThreshold,
    /// An insert probed every attempt without finding room
    ProbeExhausted,
}

/// Snapshot of the counters a benchmark cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Live entries
    pub len: usize,
    /// Slot count
    pub capacity: usize,
    /// Collisions counted since creation or the last resize
    pub total_collisions: usize,
    /// Resizes performed since creation
    pub resize_count: usize,
    /// Slots holding a tombstone
    pub tombstones: usize,
}

/// A hash table using open addressing with collision-driven growth.
///
/// Every entry lives directly in the slot array. On a collision the key walks the probe
/// sequence of its [`ProbeMethod`]. Each live entry passed before the slot a new key lands in
/// is counted, and once the running total exceeds the collision threshold the next insert
/// doubles the capacity and replays every live entry.
///
/// The capacity starts at [`INITIAL_CAPACITY`], is always a power of two and never shrinks.
///
/// Note: This implementation is not thread-safe. Shared use needs a single lock around the
/// whole table.
#[derive(Clone)]
pub struct ProbingHashTable<K, V, S = DefaultHashBuilder> {
    /// The slot array, its length is the capacity
    slots: Box<[Slot<K, V>]>,
    /// Number of occupied slots
    len: usize,
    /// Number of tombstone slots
    tombstones: usize,
    /// Probing strategy, fixed at construction
    method: ProbeMethod,
    /// Collision count (M) that, once exceeded, forces a resize on the next insert
    collision_threshold: usize,
    /// Collisions since creation or the last resize
    total_collisions: usize,
    /// Resizes performed since creation
    resize_count: usize,
    /// Builds the hasher for every key
    hash_builder: S,
    /// Capacity the next resize doubles from, in place of the real one
    #[cfg(test)]
    growth_base: Option<usize>,
}

#[allow(clippy::missing_fields_in_debug)]
impl<K, V, S> fmt::Debug for ProbingHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbingHashTable")
            .field("method", &self.method)
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("total_collisions", &self.total_collisions)
            .field("collision_threshold", &self.collision_threshold)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for ProbingHashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new(ProbeMethod::default())
    }
}

impl<K, V, S> Extend<(K, V)> for ProbingHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ProbingHashTable<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K, V> ProbingHashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty table with the default collision threshold
    #[must_use]
    pub fn new(method: ProbeMethod) -> Self {
        Self::with_threshold(method, DEFAULT_COLLISION_THRESHOLD)
    }

    /// Creates an empty table that resizes once more than `collision_threshold` collisions
    /// have been counted
    #[must_use]
    pub fn with_threshold(method: ProbeMethod, collision_threshold: usize) -> Self {
        Self::with_hasher(method, collision_threshold, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ProbingHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty table hashing keys with `hash_builder`
    #[must_use]
    pub fn with_hasher(method: ProbeMethod, collision_threshold: usize, hash_builder: S) -> Self {
        Self {
            slots: empty_slots(INITIAL_CAPACITY),
            len: 0,
            tombstones: 0,
            method,
            collision_threshold,
            total_collisions: 0,
            resize_count: 0,
            hash_builder,
            #[cfg(test)]
            growth_base: None,
        }
    }

    /// Computes the hash for a key
    fn hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Inserts a key-value pair, reporting only whether it succeeded.
    ///
    /// Returns `false` when a required resize could not allocate; the table is then left
    /// exactly as it was before the call.
    ///
    /// # Panics
    ///
    /// Panics if the entry cannot be placed even after a resize, which means the probing
    /// invariants are broken.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.try_insert(key, value) {
            Ok(_) => true,
            Err(err) => {
                warn!("insert into {} table failed: {err}", self.method);
                false
            }
        }
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// If more collisions than the threshold have been counted, the table is resized
    /// first. If the probe sequence is exhausted, the table is resized and the insertion
    /// retried once. A call that resized returns with the collision count at zero.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] or [`TableError::CapacityOverflow`] if a needed
    /// resize cannot get a larger slot array. The table is unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if the post-resize retry finds no room, which means the probing invariants
    /// are broken.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let hash = self.hash(&key);

        if self.total_collisions > self.collision_threshold {
            self.resize(ResizeReason::CollisionThreshold)?;
            return Ok(self.place_uncounted(hash, key, value));
        }

        let (probe, collisions) = self.probe_insert(hash, &key);

        match probe {
            // Overwriting in place never counts toward the threshold.
            Probe::Found(index) => Ok(self.replace_value(index, value)),
            Probe::Vacant(index) => {
                self.total_collisions = self.total_collisions.saturating_add(collisions);
                self.occupy(index, key, value);
                Ok(None)
            }
            Probe::Exhausted => {
                trace!(
                    "probe for {} table exhausted {} slots",
                    self.method,
                    self.slots.len()
                );
                self.resize(ResizeReason::ProbeExhausted)?;
                Ok(self.place_uncounted(hash, key, value))
            }
        }
    }

    /// Retrieves the value stored for `key`
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.find(key)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Retrieves a mutable reference to the value stored for `key`
    pub fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_index(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Removes `key`, leaving a tombstone so that longer probe chains stay reachable
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_index(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.len = self.len.saturating_sub(1);
                self.tombstones = self.tombstones.saturating_add(1);
                Some(value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Finds the slot holding `key`
    fn find<Q>(&self, key: &Q) -> Option<&Slot<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_index(key).and_then(|index| self.slots.get(index))
    }

    /// Walks the probe sequence of `key`, stopping at the first empty slot
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        for index in self.method.sequence(hash, self.slots.len()) {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied { key: stored, .. }
                    if <K as Borrow<Q>>::borrow(stored) == key =>
                {
                    return Some(index);
                }
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Walks the probe sequence for an insertion of `key`.
    ///
    /// Returns where the key lives or may go, and how many live entries were passed before
    /// that slot. The first tombstone is remembered but probing goes on until an empty slot
    /// proves the key absent. Tombstones are never counted as collisions, and neither is
    /// anything passed after the tombstone the entry ends up in.
    fn probe_insert(&self, hash: u64, key: &K) -> (Probe, usize) {
        let mut collisions: usize = 0;
        // (index, collisions seen before reaching it)
        let mut first_tombstone: Option<(usize, usize)> = None;

        for index in self.method.sequence(hash, self.slots.len()) {
            match self.slots.get(index) {
                None => break,
                Some(Slot::Empty) => {
                    return match first_tombstone {
                        Some((tombstone, before)) => (Probe::Vacant(tombstone), before),
                        None => (Probe::Vacant(index), collisions),
                    };
                }
                Some(Slot::Occupied { key: stored, .. }) if stored == key => {
                    return (Probe::Found(index), collisions);
                }
                Some(Slot::Tombstone) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some((index, collisions));
                    }
                }
                Some(Slot::Occupied { .. }) => {
                    collisions = collisions.saturating_add(1);
                }
            }
        }

        match first_tombstone {
            Some((tombstone, before)) => (Probe::Vacant(tombstone), before),
            None => (Probe::Exhausted, collisions),
        }
    }

    /// Places an entry right after a resize without counting collisions.
    ///
    /// # Panics
    ///
    /// Panics if the freshly doubled table has no room for the key.
    #[allow(clippy::panic)]
    fn place_uncounted(&mut self, hash: u64, key: K, value: V) -> Option<V> {
        match self.probe_insert(hash, &key).0 {
            Probe::Found(index) => self.replace_value(index, value),
            Probe::Vacant(index) => {
                self.occupy(index, key, value);
                None
            }
            Probe::Exhausted => panic!(
                "invariant violated: no slot for entry in {} table of capacity {} after resize",
                self.method,
                self.slots.len()
            ),
        }
    }

    /// Stores a new entry at `index`
    fn occupy(&mut self, index: usize, key: K, value: V) {
        if let Some(slot) = self.slots.get_mut(index) {
            if matches!(slot, Slot::Tombstone) {
                self.tombstones = self.tombstones.saturating_sub(1);
            }
            *slot = Slot::Occupied { key, value };
            self.len = self.len.saturating_add(1);
        }
    }

    /// Overwrites the value of the entry at `index`, returning the old one
    fn replace_value(&mut self, index: usize, value: V) -> Option<V> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied { value: stored, .. }) => Some(mem::replace(stored, value)),
            _ => None,
        }
    }

    /// Doubles the capacity and replays every live entry in slot order.
    ///
    /// Collisions met during the replay are not counted. Tombstones are dropped. If the
    /// new array cannot be allocated the table is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if a replayed entry finds no room, which cannot happen while the capacity
    /// doubles and keys are unique.
    #[allow(clippy::panic)]
    fn resize(&mut self, reason: ResizeReason) -> Result<(), TableError> {
        let old_capacity = self.capacity_to_grow();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow { capacity: old_capacity })?;
        let new_slots = try_empty_slots(new_capacity)?;

        debug!(
            "resizing {} table {old_capacity} -> {new_capacity} ({reason:?}), replaying {} entries, dropping {} tombstones",
            self.method, self.len, self.tombstones
        );

        let old_slots = mem::replace(&mut self.slots, new_slots);
        self.len = 0;
        self.tombstones = 0;
        self.total_collisions = 0;
        self.resize_count = self.resize_count.saturating_add(1);

        for slot in old_slots.into_vec() {
            if let Slot::Occupied { key, value } = slot {
                let hash = self.hash(&key);
                match self.probe_insert(hash, &key).0 {
                    Probe::Vacant(index) => self.occupy(index, key, value),
                    Probe::Found(_) | Probe::Exhausted => panic!(
                        "invariant violated: replay into {} table of capacity {new_capacity} failed",
                        self.method
                    ),
                }
            }
        }

        Ok(())
    }

    /// Capacity the next resize starts from
    fn capacity_to_grow(&self) -> usize {
        #[cfg(test)]
        if let Some(base) = self.growth_base {
            return base;
        }
        self.slots.len()
    }

    /// Removes every entry and resets the counters, keeping the capacity
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
        self.total_collisions = 0;
    }
}

impl<K, V, S> ProbingHashTable<K, V, S> {
    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the probing strategy
    #[must_use]
    pub fn method(&self) -> ProbeMethod {
        self.method
    }

    /// Returns the collision threshold (M)
    #[must_use]
    pub fn collision_threshold(&self) -> usize {
        self.collision_threshold
    }

    /// Returns the collisions counted since creation or the last resize
    #[must_use]
    pub fn total_collisions(&self) -> usize {
        self.total_collisions
    }

    /// Returns how many times the table has doubled
    #[must_use]
    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    /// Returns the number of tombstone slots
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    /// Returns the ratio of occupied slots to capacity
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Returns a snapshot of the table counters
    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            len: self.len,
            capacity: self.slots.len(),
            total_collisions: self.total_collisions,
            resize_count: self.resize_count,
            tombstones: self.tombstones,
        }
    }

    /// Returns an iterator over the entries in slot order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { slots: self.slots.iter() }
    }
}

/// Iterator over the entries of a table in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Remaining slots
    slots: std::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

/// Builds an all-empty slot array
fn empty_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots.into_boxed_slice()
}

/// Builds an all-empty slot array, reporting allocation failure instead of aborting
fn try_empty_slots<K, V>(capacity: usize) -> Result<Box<[Slot<K, V>]>, TableError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::Allocation { capacity, source })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots.into_boxed_slice())
}
