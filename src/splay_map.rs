use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::iter::{Iter, Keys, Values};
use crate::map::OrderedMap;
use crate::raw::RawSplayMap;

/// An ordered map backed by a self-adjusting ([splay]) binary search tree.
///
/// Splay trees store no balance metadata at all. Instead, every `get`,
/// `insert`, and `remove` performs a top-down splay that moves the accessed
/// key (or, on a miss, the last node on its search path) to the root. A
/// single operation can take time linear in the current depth, but any
/// sequence of operations is amortized logarithmic, and recently accessed
/// keys sit near the root, so skewed access patterns get faster than in the
/// rigidly balanced maps.
///
/// Because lookups restructure the tree, [`get`](Self::get),
/// [`get_mut`](Self::get_mut), and [`contains_key`](Self::contains_key)
/// take `&mut self`. The extremal and boundary queries, `sub_map`, and the
/// iterators are plain read-only descents and leave the shape alone.
///
/// [splay]: https://en.wikipedia.org/wiki/Splay_tree
///
/// # Examples
///
/// ```
/// use ordmap::SplayMap;
///
/// let mut recent = SplayMap::new();
/// recent.insert("alpha", 1);
/// recent.insert("beta", 2);
/// recent.insert("gamma", 3);
///
/// // Lookups take &mut self: the touched key is splayed to the root.
/// assert_eq!(recent.get("beta"), Some(&2));
/// assert_eq!(recent.remove("alpha"), Some(1));
/// let keys: Vec<&str> = recent.keys().copied().collect();
/// assert_eq!(keys, ["beta", "gamma"]);
/// ```
#[derive(Clone)]
pub struct SplayMap<K, V> {
    raw: RawSplayMap<K, V>,
}

impl<K, V> SplayMap<K, V> {
    /// Creates an empty map; does not allocate until the first insertion.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawSplayMap::new(),
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

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord, V> SplayMap<K, V> {
    /// Returns a reference to the value corresponding to the key, splaying
    /// it to the root on a hit.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// splaying it to the root on a hit.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains the key; the probed key is
    /// splayed like any other access.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Inserts a key-value pair, returning the replaced value if the key
    /// was already present. A fresh key becomes the new root.
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

impl<K, V> Default for SplayMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for SplayMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SplayMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for SplayMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a SplayMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> OrderedMap<K, V> for SplayMap<K, V> {
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
