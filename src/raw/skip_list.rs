use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::{SmallVec, smallvec};

use super::arena::{Arena, Handle};

/// Default level bound; the list holds up to `2^16` entries at expected
/// balance.
pub(crate) const DEFAULT_MAX_LEVEL: usize = 16;

/// Default RNG seed. There is no entropy source in a `no_std` crate, and a
/// deterministic default makes failures reproducible; callers that want
/// different towers seed explicitly.
pub(crate) const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Forward links of one node; expected node level is 2, so four inline
/// slots cover almost every allocation.
type Links = SmallVec<[Option<Handle>; 4]>;

/// Header forward links / update arrays; sized for the default level bound.
type LevelLinks = SmallVec<[Option<Handle>; DEFAULT_MAX_LEVEL]>;

#[derive(Clone)]
struct SkipNode<K, V> {
    key: K,
    value: V,
    /// `forward[i]` is the next node on lane `i`; `None` ends the lane.
    /// The vector length is the node's level, fixed at insertion.
    forward: Links,
}

/// The layered-list core backing `SkipListMap`.
///
/// The header is the map's own `head` array (a predecessor of `None` in
/// the walking code means "the header") and the trailer is simply `None`,
/// so no sentinel nodes exist. Search cost is expected-logarithmic under
/// the geometric level distribution; the worst case is linear.
#[derive(Clone)]
pub(crate) struct RawSkipListMap<K, V> {
    nodes: Arena<SkipNode<K, V>>,
    /// Forward links out of the header, one per possible level.
    head: LevelLinks,
    max_level: usize,
    /// Highest level currently in use; grows by at most 1 per insertion.
    level_count: usize,
    len: usize,
    rng: SmallRng,
}

impl<K, V> RawSkipListMap<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_config(DEFAULT_MAX_LEVEL, DEFAULT_SEED)
    }

    pub(crate) fn with_config(max_level: usize, seed: u64) -> Self {
        assert!(max_level >= 1, "`RawSkipListMap::with_config()` - `max_level` must be at least 1!");
        Self {
            nodes: Arena::new(),
            head: smallvec![None; max_level],
            max_level,
            level_count: 1,
            len: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head.fill(None);
        self.level_count = 1;
        self.len = 0;
    }

    #[inline]
    fn node(&self, handle: Handle) -> &SkipNode<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut SkipNode<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Next node on lane `level` after `from` (`None` = the header).
    #[inline]
    fn forward_of(&self, from: Option<Handle>, level: usize) -> Option<Handle> {
        match from {
            None => self.head[level],
            Some(h) => self.node(h).forward[level],
        }
    }

    #[inline]
    fn set_forward(&mut self, from: Option<Handle>, level: usize, to: Option<Handle>) {
        match from {
            None => self.head[level] = to,
            Some(h) => self.node_mut(h).forward[level] = to,
        }
    }

    fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (&node.key, &node.value)
    }

    /// Level for a new node: repeated fair coin flips, geometric
    /// distribution `P(level = L) = 2^-L`, capped at `max_level`.
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level
    }
}

impl<K: Ord, V> RawSkipListMap<K, V> {
    /// Last node whose key is `<` the probe (`<=` when `inclusive`), or
    /// `None` when no node qualifies, i.e. the header position.
    fn seek<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current: Option<Handle> = None;
        for level in (0..self.level_count).rev() {
            while let Some(next) = self.forward_of(current, level) {
                let advance = match self.node(next).key.borrow().cmp(key) {
                    Ordering::Less => true,
                    Ordering::Equal => inclusive,
                    Ordering::Greater => false,
                };
                if advance {
                    current = Some(next);
                } else {
                    break;
                }
            }
        }
        current
    }

    /// The `seek(<)` walk, additionally recording the last node visited
    /// before each level drop: the node whose forward pointer at that
    /// level changes if a splice happens.
    fn find_update<Q>(&self, key: &Q) -> LevelLinks
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut update: LevelLinks = smallvec![None; self.level_count];
        let mut current: Option<Handle> = None;
        for level in (0..self.level_count).rev() {
            while let Some(next) = self.forward_of(current, level) {
                if self.node(next).key.borrow() < key {
                    current = Some(next);
                } else {
                    break;
                }
            }
            update[level] = current;
        }
        update
    }

    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let previous = self.seek(key, false);
        self.forward_of(previous, 0).filter(|&h| self.node(h).key.borrow() == key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|h| &self.node(h).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(&mut self.node_mut(handle).value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut update = self.find_update(&key);
        if let Some(next) = self.forward_of(update[0], 0)
            && self.node(next).key == key
        {
            return Some(core::mem::replace(&mut self.node_mut(next).value, value));
        }

        let mut level = self.random_level();
        if level > self.level_count {
            // The in-use level grows by at most one per insertion; the new
            // top lane starts at the header.
            self.level_count += 1;
            level = self.level_count;
            update.push(None);
        }

        let mut forward: Links = smallvec![None; level];
        for (lane, slot) in forward.iter_mut().enumerate() {
            *slot = self.forward_of(update[lane], lane);
        }
        let handle = self.nodes.alloc(SkipNode { key, value, forward });
        for lane in 0..level {
            self.set_forward(update[lane], lane, Some(handle));
        }
        self.len += 1;
        debug_assert_eq!(self.nodes.len(), self.len);
        None
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let update = self.find_update(key);
        let target = self.forward_of(update[0], 0)?;
        if self.node(target).key.borrow() != key {
            return None;
        }
        // Splice the node out of every lane it participates in.
        for lane in 0..self.node(target).forward.len() {
            let next = self.node(target).forward[lane];
            self.set_forward(update[lane], lane, next);
        }
        let removed = self.nodes.take(target);
        self.len -= 1;
        Some(removed.value)
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.forward_of(None, 0).map(|h| self.key_value(h))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut current: Option<Handle> = None;
        for level in (0..self.level_count).rev() {
            while let Some(next) = self.forward_of(current, level) {
                current = Some(next);
            }
        }
        current.map(|h| self.key_value(h))
    }

    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.forward_of(self.seek(key, false), 0).map(|h| self.key_value(h))
    }

    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.seek(key, true).map(|h| self.key_value(h))
    }

    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.seek(key, false).map(|h| self.key_value(h))
    }

    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.forward_of(self.seek(key, true), 0).map(|h| self.key_value(h))
    }

    /// Ascending snapshot: one walk along lane 0.
    pub(crate) fn entries(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.forward_of(None, 0);
        while let Some(h) = current {
            out.push(self.key_value(h));
            current = self.node(h).forward[0];
        }
        out
    }

    /// Ascending snapshot of all entries with `from <= key < to`.
    /// Empty when `from >= to`.
    pub(crate) fn sub_map<Q>(&self, from: &Q, to: &Q) -> Vec<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut out = Vec::new();
        if from >= to {
            return out;
        }
        let mut current = self.forward_of(self.seek(from, false), 0);
        while let Some(h) = current {
            let node = self.node(h);
            if node.key.borrow() >= to {
                break;
            }
            out.push((&node.key, &node.value));
            current = node.forward[0];
        }
        out
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    impl<K: Ord, V> RawSkipListMap<K, V> {
        /// Checks lane structure: lane 0 is the sorted entry list, and each
        /// higher lane is exactly the subsequence of nodes tall enough to
        /// reach it.
        pub(crate) fn validate_invariants(&self) {
            assert!(self.level_count >= 1 && self.level_count <= self.max_level);

            let mut lane0: Vec<Handle> = Vec::new();
            let mut current = self.forward_of(None, 0);
            while let Some(h) = current {
                lane0.push(h);
                current = self.node(h).forward[0];
            }
            assert_eq!(lane0.len(), self.len, "len out of sync with lane 0");
            assert!(
                lane0.windows(2).all(|w| self.node(w[0]).key < self.node(w[1]).key),
                "lane 0 keys must be strictly increasing"
            );

            for handle in &lane0 {
                let level = self.node(*handle).forward.len();
                assert!(level >= 1 && level <= self.level_count, "node level out of range");
            }

            for level in 1..self.level_count {
                let expected: Vec<Handle> =
                    lane0.iter().copied().filter(|h| self.node(*h).forward.len() > level).collect();
                let mut actual = Vec::new();
                let mut current = self.forward_of(None, level);
                while let Some(h) = current {
                    actual.push(h);
                    current = self.node(h).forward[level];
                }
                assert_eq!(actual, expected, "lane {level} is not the subsequence of tall nodes");
            }
        }
    }

    #[test]
    fn insert_get_remove_round_trip() {
        let mut map = RawSkipListMap::new();
        for key in [5, 1, 9, 3, 7] {
            assert_eq!(map.insert(key, key * 2), None);
            map.validate_invariants();
        }
        assert_eq!(map.insert(3, 33), Some(6));
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(&3), Some(&33));
        assert_eq!(map.remove(&3), Some(33));
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.get(&3), None);
        map.validate_invariants();
    }

    #[test]
    fn level_count_grows_by_at_most_one_per_insert() {
        let mut map = RawSkipListMap::with_config(DEFAULT_MAX_LEVEL, 42);
        let mut previous = 1;
        for key in 0..4096 {
            map.insert(key, ());
            assert!(map.level_count <= previous + 1, "level jumped from {previous} to {}", map.level_count);
            previous = map.level_count;
        }
        assert!(map.level_count <= DEFAULT_MAX_LEVEL);
        map.validate_invariants();
    }

    #[test]
    fn same_seed_builds_identical_towers() {
        let mut a = RawSkipListMap::with_config(12, 7);
        let mut b = RawSkipListMap::with_config(12, 7);
        for key in 0..256 {
            a.insert(key, ());
            b.insert(key, ());
        }
        let levels = |map: &RawSkipListMap<i32, ()>| {
            let mut out = Vec::new();
            let mut current = map.forward_of(None, 0);
            while let Some(h) = current {
                out.push(map.node(h).forward.len());
                current = map.node(h).forward[0];
            }
            out
        };
        assert_eq!(levels(&a), levels(&b));
    }

    #[test]
    fn max_level_one_degenerates_to_a_list() {
        let mut map = RawSkipListMap::with_config(1, 0);
        for key in [4, 2, 8, 6] {
            map.insert(key, key);
        }
        map.validate_invariants();
        assert_eq!(map.level_count, 1);
        let keys: Vec<i32> = map.entries().iter().map(|(k, _)| **k).collect();
        assert_eq!(keys, [2, 4, 6, 8]);
    }

    proptest! {
        /// Lookups must succeed for every stored key no matter which level
        /// sequence the seed produces.
        #[test]
        fn all_keys_retrievable_under_any_seed(
            seed in any::<u64>(),
            keys in prop::collection::btree_set(-500i32..500, 0..200),
        ) {
            let mut map = RawSkipListMap::with_config(DEFAULT_MAX_LEVEL, seed);
            for &key in &keys {
                map.insert(key, key * 3);
            }
            map.validate_invariants();
            for &key in &keys {
                prop_assert_eq!(map.get(&key), Some(&(key * 3)));
            }
            prop_assert_eq!(map.len(), keys.len());
        }

        #[test]
        fn random_ops_match_model(
            seed in any::<u64>(),
            ops in prop::collection::vec((any::<bool>(), -48i32..48, any::<i32>()), 0..384),
        ) {
            let mut map = RawSkipListMap::with_config(DEFAULT_MAX_LEVEL, seed);
            let mut model = alloc::collections::BTreeMap::new();

            for (is_insert, key, value) in ops {
                if is_insert {
                    prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                } else {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                prop_assert_eq!(map.len(), model.len());
            }
            map.validate_invariants();

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
            let keys: Vec<i32> = map.entries().iter().map(|(k, _)| **k).collect();
            let expected: Vec<i32> = model.keys().copied().collect();
            prop_assert_eq!(keys, expected);
        }
    }
}
