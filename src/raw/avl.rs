use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::{Arena, Handle};

/// Node of the height-balanced tree.
///
/// `parent` is informational: it drives the bottom-up rebalance walk and
/// successor iteration, but ownership always stays with the arena.
#[derive(Clone)]
pub(crate) struct AvlNode<K, V> {
    key: K,
    value: V,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    /// Height of the subtree rooted here; 1 for a leaf.
    height: u32,
}

impl<K, V> AvlNode<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            left: None,
            right: None,
            height: 1,
        }
    }
}

/// The height-balanced core backing `AvlMap`.
///
/// Invariant: for every node, `|height(left) - height(right)| <= 1` and
/// `height == 1 + max(height(left), height(right))`, with an absent child
/// counting as height 0.
#[derive(Clone)]
pub(crate) struct RawAvlMap<K, V> {
    nodes: Arena<AvlNode<K, V>>,
    root: Option<Handle>,
    len: usize,
}

impl<K, V> RawAvlMap<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
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
        self.root = None;
        self.len = 0;
    }

    #[inline]
    fn node(&self, handle: Handle) -> &AvlNode<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut AvlNode<K, V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn height_of(&self, link: Option<Handle>) -> u32 {
        link.map_or(0, |h| self.node(h).height)
    }

    fn update_height(&mut self, handle: Handle) {
        let height = 1 + self.height_of(self.node(handle).left).max(self.height_of(self.node(handle).right));
        self.node_mut(handle).height = height;
    }

    #[inline]
    fn balance_factor(&self, handle: Handle) -> i32 {
        let node = self.node(handle);
        self.height_of(node.left) as i32 - self.height_of(node.right) as i32
    }

    fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (&node.key, &node.value)
    }

    /// Leftmost node of the subtree rooted at `handle`.
    fn minimum(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left {
            handle = left;
        }
        handle
    }

    fn maximum(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right {
            handle = right;
        }
        handle
    }

    /// In-order successor via the parent links; no stack, no recursion.
    fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.node(handle).right {
            return Some(self.minimum(right));
        }
        let mut current = handle;
        let mut parent = self.node(current).parent;
        while let Some(p) = parent {
            if self.node(p).right == Some(current) {
                current = p;
                parent = self.node(p).parent;
            } else {
                return Some(p);
            }
        }
        None
    }

    /// Turns `node` into the left child of its right child.
    ///
    /// Heights are recomputed for the demoted node first; the promoted
    /// node's height depends on it.
    fn rotate_left(&mut self, node: Handle) {
        let y = self.node(node).right.expect("`rotate_left()` requires a right child");
        let y_left = self.node(y).left;
        self.node_mut(node).right = y_left;
        if let Some(h) = y_left {
            self.node_mut(h).parent = Some(node);
        }
        let parent = self.node(node).parent;
        self.node_mut(y).parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.node(p).left == Some(node) {
                    self.node_mut(p).left = Some(y);
                } else {
                    self.node_mut(p).right = Some(y);
                }
            }
        }
        self.node_mut(y).left = Some(node);
        self.node_mut(node).parent = Some(y);
        self.update_height(node);
        self.update_height(y);
    }

    /// Mirror image of [`Self::rotate_left`].
    fn rotate_right(&mut self, node: Handle) {
        let x = self.node(node).left.expect("`rotate_right()` requires a left child");
        let x_right = self.node(x).right;
        self.node_mut(node).left = x_right;
        if let Some(h) = x_right {
            self.node_mut(h).parent = Some(node);
        }
        let parent = self.node(node).parent;
        self.node_mut(x).parent = parent;
        match parent {
            None => self.root = Some(x),
            Some(p) => {
                if self.node(p).left == Some(node) {
                    self.node_mut(p).left = Some(x);
                } else {
                    self.node_mut(p).right = Some(x);
                }
            }
        }
        self.node_mut(x).right = Some(node);
        self.node_mut(node).parent = Some(x);
        self.update_height(node);
        self.update_height(x);
    }

    /// Walks from `node` to the root, rotating wherever the balance factor
    /// reaches +/-2 and refreshing heights along the way.
    fn rebalance(&mut self, mut node: Handle) {
        loop {
            let balance = self.balance_factor(node);
            if balance == 2 {
                let left = self.node(node).left.expect("left-heavy node has a left child");
                // `>=`: the equal-heights case (possible after a removal)
                // needs the single rotation.
                if self.height_of(self.node(left).left) >= self.height_of(self.node(left).right) {
                    self.rotate_right(node);
                } else {
                    self.rotate_left(left);
                    self.rotate_right(node);
                }
            } else if balance == -2 {
                let right = self.node(node).right.expect("right-heavy node has a right child");
                if self.height_of(self.node(right).right) >= self.height_of(self.node(right).left) {
                    self.rotate_left(node);
                } else {
                    self.rotate_right(right);
                    self.rotate_left(node);
                }
            }
            self.update_height(node);
            match self.node(node).parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
    }

    /// Replaces the subtree rooted at `u` with the subtree rooted at `v`.
    fn transplant(&mut self, u: Handle, v: Option<Handle>) {
        let parent = self.node(u).parent;
        match parent {
            None => self.root = v,
            Some(p) => {
                if self.node(p).left == Some(u) {
                    self.node_mut(p).left = v;
                } else {
                    self.node_mut(p).right = v;
                }
            }
        }
        if let Some(h) = v {
            self.node_mut(h).parent = parent;
        }
    }
}

impl<K: Ord, V> RawAvlMap<K, V> {
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(h),
            }
        }
        None
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

    /// Inserts or replaces. The key is never overwritten on replacement;
    /// only the value slot is mutable after insertion.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(AvlNode::new(key, value));
            self.root = Some(handle);
            self.len = 1;
            return None;
        };

        let mut current = root;
        let (parent, went_left) = loop {
            match key.cmp(&self.node(current).key) {
                Ordering::Less => match self.node(current).left {
                    Some(left) => current = left,
                    None => break (current, true),
                },
                Ordering::Greater => match self.node(current).right {
                    Some(right) => current = right,
                    None => break (current, false),
                },
                Ordering::Equal => {
                    return Some(core::mem::replace(&mut self.node_mut(current).value, value));
                }
            }
        };

        let mut node = AvlNode::new(key, value);
        node.parent = Some(parent);
        let handle = self.nodes.alloc(node);
        if went_left {
            self.node_mut(parent).left = Some(handle);
        } else {
            self.node_mut(parent).right = Some(handle);
        }
        self.len += 1;
        self.rebalance(parent);
        debug_assert_eq!(self.nodes.len(), self.len);
        None
    }

    /// Removes `key` if present.
    ///
    /// A node with two children is replaced by relinking its in-order
    /// successor into its position (the successor keeps its own key and
    /// value; only links change), then the walk rebalances from the point
    /// where the structure actually changed.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.search(key)?;
        let parent = self.node(node).parent;
        let left = self.node(node).left;
        let right = self.node(node).right;

        let fix = match (left, right) {
            (None, _) => {
                self.transplant(node, right);
                parent
            }
            (_, None) => {
                self.transplant(node, left);
                parent
            }
            (Some(left), Some(right)) => {
                let succ = self.minimum(right);
                let succ_parent = self.node(succ).parent;
                let fix = if succ_parent == Some(node) {
                    // The successor is the direct right child; it is the
                    // deepest node whose subtree changed.
                    Some(succ)
                } else {
                    let succ_right = self.node(succ).right;
                    self.transplant(succ, succ_right);
                    self.node_mut(succ).right = Some(right);
                    self.node_mut(right).parent = Some(succ);
                    succ_parent
                };
                self.node_mut(succ).left = Some(left);
                self.node_mut(left).parent = Some(succ);
                self.transplant(node, Some(succ));
                fix
            }
        };

        let removed = self.nodes.take(node);
        self.len -= 1;
        if let Some(fix) = fix {
            self.rebalance(fix);
        }
        Some(removed.value)
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.key_value(self.minimum(root)))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.key_value(self.maximum(root)))
    }

    fn ceiling_handle<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    best = Some(h);
                    current = node.left;
                }
                Ordering::Equal => return Some(h),
                Ordering::Greater => current = node.right,
            }
        }
        best
    }

    /// Least key `>=` the probe.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.ceiling_handle(key).map(|h| self.key_value(h))
    }

    /// Greatest key `<=` the probe.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Greater => {
                    best = Some(h);
                    current = node.right;
                }
                Ordering::Equal => return Some(self.key_value(h)),
                Ordering::Less => current = node.left,
            }
        }
        best.map(|h| self.key_value(h))
    }

    /// Greatest key strictly `<` the probe.
    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            if node.key.borrow() < key {
                best = Some(h);
                current = node.right;
            } else {
                current = node.left;
            }
        }
        best.map(|h| self.key_value(h))
    }

    /// Least key strictly `>` the probe.
    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            if node.key.borrow() > key {
                best = Some(h);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        best.map(|h| self.key_value(h))
    }

    /// Ascending snapshot of all entries.
    pub(crate) fn entries(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.root.map(|root| self.minimum(root));
        while let Some(h) = current {
            out.push(self.key_value(h));
            current = self.successor(h);
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
        let mut current = self.ceiling_handle(from);
        while let Some(h) = current {
            let node = self.node(h);
            if node.key.borrow() >= to {
                break;
            }
            out.push((&node.key, &node.value));
            current = self.successor(h);
        }
        out
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawAvlMap<K, V> {
        /// Checks every structural invariant; panics on the first violation.
        pub(crate) fn validate_invariants(&self) {
            if self.root.is_none() {
                assert_eq!(self.len, 0, "empty tree must have len 0");
                return;
            }
            let root = self.root.unwrap();
            assert_eq!(self.node(root).parent, None, "root must not have a parent");

            // Iterative post-order so the checks also run on adversarial
            // shapes without touching the call stack.
            let mut count = 0usize;
            let mut stack = alloc::vec![(root, false)];
            while let Some((h, expanded)) = stack.pop() {
                let node = self.node(h);
                if expanded {
                    count += 1;
                    let hl = self.height_of(node.left);
                    let hr = self.height_of(node.right);
                    assert_eq!(node.height, 1 + hl.max(hr), "stale height at {:?}", node.key);
                    assert!(
                        hl.abs_diff(hr) <= 1,
                        "balance factor out of range at {:?}: left {hl}, right {hr}",
                        node.key
                    );
                } else {
                    stack.push((h, true));
                    for child in [node.left, node.right].into_iter().flatten() {
                        assert_eq!(self.node(child).parent, Some(h), "broken parent link under {:?}", node.key);
                        stack.push((child, false));
                    }
                }
            }
            assert_eq!(count, self.len, "len out of sync with reachable nodes");

            let entries = self.entries();
            assert!(
                entries.windows(2).all(|w| w[0].0 < w[1].0),
                "in-order keys must be strictly increasing"
            );
        }
    }

    #[test]
    fn sequential_inserts_stay_balanced() {
        let mut map = RawAvlMap::new();
        for i in 0..1024 {
            assert_eq!(map.insert(i, i * 10), None);
            map.validate_invariants();
        }
        // Height of a 1024-node AVL tree is at most 1.44 * log2(1024).
        assert!(map.height_of(map.root) <= 15);
        for i in 0..1024 {
            assert_eq!(map.get(&i), Some(&(i * 10)));
        }
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let mut map = RawAvlMap::new();
        assert_eq!(map.insert(7, "a"), None);
        assert_eq!(map.insert(7, "b"), Some("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&7), Some(&"b"));
    }

    #[test]
    fn remove_node_with_distant_successor() {
        // These inserts settle with 60 at the root; its successor 65 sits
        // below 75, so removal takes the double-transplant path.
        let mut map = RawAvlMap::new();
        for key in [50, 25, 75, 60, 90, 55, 65] {
            map.insert(key, key);
        }
        assert_eq!(map.remove(&60), Some(60));
        map.validate_invariants();
        assert_eq!(map.get(&60), None);
        assert_eq!(map.len(), 6);
        let keys: Vec<i32> = map.entries().iter().map(|(k, _)| **k).collect();
        assert_eq!(keys, [25, 50, 55, 65, 75, 90]);

        // And the direct-right-child case: 50's successor is 55 itself.
        assert_eq!(map.remove(&50), Some(50));
        map.validate_invariants();
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn remove_missing_is_none() {
        let mut map: RawAvlMap<i32, i32> = RawAvlMap::new();
        assert_eq!(map.remove(&1), None);
        map.insert(1, 1);
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.len(), 1);
    }

    proptest! {
        #[test]
        fn random_ops_match_model(ops in prop::collection::vec((any::<bool>(), -64i32..64, any::<i32>()), 0..512)) {
            let mut map = RawAvlMap::new();
            let mut model = alloc::collections::BTreeMap::new();

            for (is_insert, key, value) in ops {
                if is_insert {
                    prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                } else {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                map.validate_invariants();
                prop_assert_eq!(map.len(), model.len());
            }

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
            let keys: Vec<i32> = map.entries().iter().map(|(k, _)| **k).collect();
            let expected: Vec<i32> = model.keys().copied().collect();
            prop_assert_eq!(keys, expected);
        }
    }
}
