use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::iter::{Iter, Keys, Values};
use crate::map::OrderedMap;
use crate::raw::{DEFAULT_MAX_LEVEL, RawSkipListMap};

/// An ordered map backed by a [skip list].
///
/// A skip list keeps its entries in one sorted linked list and gives each
/// node a randomly chosen *level*: a node of level `L` also participates in
/// `L - 1` sparser "express lanes" above the base list. Searches start in
/// the sparsest lane and drop down a lane at each overshoot, which makes
/// lookup, insertion, and removal expected-logarithmic: a probabilistic
/// guarantee rather than a structural one; the worst case is linear.
/// Mutations splice forward pointers and never rotate anything.
///
/// Levels are drawn from a geometric distribution by fair coin flips,
/// capped by `max_level` ([`DEFAULT_MAX_LEVEL`](Self::DEFAULT_MAX_LEVEL)
/// = 16, enough for about `2^16` entries at expected balance) and by the
/// rule that the tallest level in use grows by at most one per insertion.
///
/// The crate is `no_std`, so there is no ambient entropy source:
/// [`new`](Self::new) uses a fixed seed and therefore produces the same
/// tower shape for the same insertion sequence every run. Use
/// [`with_seed`](Self::with_seed) or [`with_config`](Self::with_config) to
/// vary it.
///
/// [skip list]: https://en.wikipedia.org/wiki/Skip_list
///
/// # Examples
///
/// ```
/// use ordmap::SkipListMap;
///
/// let mut lanes = SkipListMap::new();
/// lanes.insert(30, "thirty");
/// lanes.insert(10, "ten");
/// lanes.insert(20, "twenty");
///
/// assert_eq!(lanes.get(&20), Some(&"twenty"));
/// assert_eq!(lanes.floor(&25), Some((&20, &"twenty")));
/// assert_eq!(lanes.sub_map(&10, &30).len(), 2);
/// assert_eq!(lanes.remove(&10), Some("ten"));
/// ```
#[derive(Clone)]
pub struct SkipListMap<K, V> {
    raw: RawSkipListMap<K, V>,
}

impl<K, V> SkipListMap<K, V> {
    /// Default bound on node levels; supports roughly `2^16` entries at
    /// expected balance.
    pub const DEFAULT_MAX_LEVEL: usize = DEFAULT_MAX_LEVEL;

    /// Creates an empty map with the default level bound and seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: RawSkipListMap::new(),
        }
    }

    /// Creates an empty map with the default level bound and the given RNG
    /// seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(DEFAULT_MAX_LEVEL, seed)
    }

    /// Creates an empty map with a custom level bound and RNG seed.
    ///
    /// `max_level` bounds how many express lanes a node can join; a list
    /// holding up to `2^max_level` entries stays at expected balance.
    ///
    /// # Panics
    ///
    /// Panics if `max_level` is zero.
    #[must_use]
    pub fn with_config(max_level: usize, seed: u64) -> Self {
        Self {
            raw: RawSkipListMap::with_config(max_level, seed),
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes all entries. The level bound and RNG state are kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord, V> SkipListMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Inserts a key-value pair, returning the replaced value if the key
    /// was already present. The stored key is never overwritten.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.ceiling(key)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.floor(key)
    }

    /// Returns the entry with the greatest key strictly less than `key`.
    pub fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.lower(key)
    }

    /// Returns the entry with the least key strictly greater than `key`.
    pub fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.higher(key)
    }

    /// Returns an ascending snapshot of all entries with
    /// `from <= key < to`; empty when `from >= to`.
    pub fn sub_map<Q>(&self, from: &Q, to: &Q) -> Vec<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.sub_map(from, to)
    }

    /// Returns an ascending snapshot iterator over the entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.raw.entries())
    }

    /// Returns an ascending iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.raw.entries())
    }

    /// Returns an ascending iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.raw.entries())
    }
}

impl<K, V> Default for SkipListMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for SkipListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipListMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for SkipListMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a SkipListMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> OrderedMap<K, V> for SkipListMap<K, V> {
    fn len(&self) -> usize {
        self.raw.len()
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove(key)
    }

    fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.ceiling(key)
    }

    fn floor(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.floor(key)
    }

    fn lower(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.lower(key)
    }

    fn higher(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.higher(key)
    }

    fn sub_map(&self, from: &K, to: &K) -> Vec<(&K, &V)> {
        self.raw.sub_map(from, to)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.raw.entries()
    }
}
