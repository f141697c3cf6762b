use alloc::vec::Vec;

/// The contract shared by every map in this crate.
///
/// All four implementations keep their entries in ascending key order under
/// a strict total order (`K: Ord`) and agree on the same operation
/// semantics:
///
/// - [`insert`](Self::insert) replaces the value of an existing key (the
///   key itself is never overwritten) and returns the prior value.
/// - Lookups and boundary queries on a missing key return `None`; that is a
///   normal outcome, never an error.
/// - [`ceiling`](Self::ceiling) and [`floor`](Self::floor) include an exact
///   match; [`lower`](Self::lower) and [`higher`](Self::higher) exclude it.
/// - [`sub_map`](Self::sub_map) is the half-open range `[from, to)` in
///   ascending order, and is empty whenever `from >= to`.
/// - [`entries`](Self::entries) is an ascending snapshot of the whole map.
///
/// Lookup methods take `&mut self`: the self-adjusting [`SplayMap`] variant
/// restructures its tree on every access, and the contract is written for
/// the least capable implementor. [`AvlMap`], [`RedBlackMap`], and
/// [`SkipListMap`] additionally expose `&self` lookups as inherent methods.
///
/// [`SplayMap`]: crate::SplayMap
/// [`AvlMap`]: crate::AvlMap
/// [`RedBlackMap`]: crate::RedBlackMap
/// [`SkipListMap`]: crate::SkipListMap
///
/// # Examples
///
/// Code written against the trait runs unchanged on any variant:
///
/// ```
/// use ordmap::{AvlMap, OrderedMap, SkipListMap, SplayMap};
///
/// fn median_key<M: OrderedMap<i32, ()>>(map: &mut M) -> Option<i32> {
///     let keys: Vec<i32> = map.entries().iter().map(|(k, _)| **k).collect();
///     keys.get(keys.len() / 2).copied()
/// }
///
/// let mut avl = AvlMap::new();
/// let mut splay = SplayMap::new();
/// let mut skip = SkipListMap::new();
/// for key in [3, 1, 4, 1, 5, 9, 2, 6] {
///     avl.insert(key, ());
///     splay.insert(key, ());
///     skip.insert(key, ());
/// }
/// assert_eq!(median_key(&mut avl), median_key(&mut splay));
/// assert_eq!(median_key(&mut avl), median_key(&mut skip));
/// ```
pub trait OrderedMap<K: Ord, V> {
    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored under `key`, or `None` if absent.
    fn get(&mut self, key: &K) -> Option<&V>;

    fn contains_key(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `key -> value`; returns the value it replaced, if any.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key`; returns the removed value, if any.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Entry with the smallest key.
    fn first_key_value(&self) -> Option<(&K, &V)>;

    /// Entry with the largest key.
    fn last_key_value(&self) -> Option<(&K, &V)>;

    /// Entry with the least key `>= key`.
    fn ceiling(&self, key: &K) -> Option<(&K, &V)>;

    /// Entry with the greatest key `<= key`.
    fn floor(&self, key: &K) -> Option<(&K, &V)>;

    /// Entry with the greatest key strictly `< key`.
    fn lower(&self, key: &K) -> Option<(&K, &V)>;

    /// Entry with the least key strictly `> key`.
    fn higher(&self, key: &K) -> Option<(&K, &V)>;

    /// Ascending snapshot of all entries with `from <= key < to`; empty
    /// when `from >= to`.
    fn sub_map(&self, from: &K, to: &K) -> Vec<(&K, &V)>;

    /// Ascending snapshot of every entry.
    fn entries(&self) -> Vec<(&K, &V)>;
}
