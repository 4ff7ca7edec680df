//! Utility traits for `ProbingHashTable`

use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
};

use crate::ProbingHashTable;

/// Extension trait for map implementations that provides additional utility methods
pub trait HashMapExtensions<K, V> {
    /// Returns the keys of the hash map as a Vec, in slot order
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the hash map as a Vec, in slot order
    fn values(&self) -> Vec<V>;

    /// Returns true if the hash map contains the given key
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}

impl<K, V, S> HashMapExtensions<K, V> for ProbingHashTable<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.search(key).is_some()
    }
}
