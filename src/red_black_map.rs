use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::iter::{Iter, Keys, Values};
use crate::map::OrderedMap;
use crate::raw::RawRedBlackMap;

/// An ordered map backed by a [red-black] binary search tree.
///
/// Balance comes from a two-coloring of the nodes: the root is black, a red
/// node never has a red child, and every path from a node down to a missing
/// child crosses the same number of black nodes. Mutations restore these
/// rules with localized recoloring and at most three rotations, which keeps
/// the tree within twice the minimal height. Compared to [`AvlMap`] the
/// paths are a little longer but insertions and removals touch fewer nodes,
/// which tends to win on write-heavy workloads.
///
/// The API is identical to [`AvlMap`]'s; see there for the full method
/// examples.
///
/// [red-black]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [`AvlMap`]: crate::AvlMap
///
/// # Examples
///
/// ```
/// use ordmap::RedBlackMap;
///
/// let mut map = RedBlackMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// map.insert("c", 3);
///
/// assert_eq!(map.get("a"), Some(&1));
/// assert_eq!(map.first_key_value(), Some((&"a", &1)));
/// assert_eq!(map.higher("a"), Some((&"b", &2)));
/// assert_eq!(map.remove("b"), Some(2));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Clone)]
pub struct RedBlackMap<K, V> {
    raw: RawRedBlackMap<K, V>,
}

impl<K, V> RedBlackMap<K, V> {
    /// Creates an empty map; does not allocate until the first insertion.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawRedBlackMap::new(),
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

impl<K: Ord, V> RedBlackMap<K, V> {
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

impl<K, V> Default for RedBlackMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedBlackMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a RedBlackMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> OrderedMap<K, V> for RedBlackMap<K, V> {
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
