use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::{Arena, Handle};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Node of the red-black tree. An absent child (`None`) stands in for the
/// textbook sentinel and always reads as Black.
#[derive(Clone)]
pub(crate) struct RbNode<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> RbNode<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            // A red leaf never changes black-heights; only the
            // no-two-reds rule can need fixing.
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }
}

/// The red-black core backing `RedBlackMap`.
///
/// Invariants: the root is Black; no Red node has a Red child; every path
/// from a node down to an absent-child position crosses the same number of
/// Black nodes.
#[derive(Clone)]
pub(crate) struct RawRedBlackMap<K, V> {
    nodes: Arena<RbNode<K, V>>,
    root: Option<Handle>,
    len: usize,
}

impl<K, V> RawRedBlackMap<K, V> {
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
    fn node(&self, handle: Handle) -> &RbNode<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut RbNode<K, V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|h| self.node(h).color == Color::Red)
    }

    fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (&node.key, &node.value)
    }

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
    }

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
    }

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

    /// Restores the no-two-reds rule after attaching a Red leaf.
    fn insert_fixup(&mut self, mut node: Handle) {
        loop {
            let Some(parent) = self.node(node).parent else { break };
            if self.node(parent).color != Color::Red {
                break;
            }
            // A Red parent is never the root, so the grandparent exists.
            let grandparent = self.node(parent).parent.expect("red parent has a grandparent");
            if Some(parent) == self.node(grandparent).left {
                let uncle = self.node(grandparent).right;
                if self.is_red(uncle) {
                    // Push the violation two levels up.
                    self.node_mut(parent).color = Color::Black;
                    if let Some(u) = uncle {
                        self.node_mut(u).color = Color::Black;
                    }
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else if Some(node) == self.node(parent).right {
                    // Inner (zig-zag) child: rotate into the outer shape.
                    node = parent;
                    self.rotate_left(parent);
                } else {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.node(grandparent).left;
                if self.is_red(uncle) {
                    self.node_mut(parent).color = Color::Black;
                    if let Some(u) = uncle {
                        self.node_mut(u).color = Color::Black;
                    }
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else if Some(node) == self.node(parent).left {
                    node = parent;
                    self.rotate_right(parent);
                } else {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        if let Some(root) = self.root {
            self.node_mut(root).color = Color::Black;
        }
    }

    /// Restores equal black-heights after a Black node was spliced out.
    ///
    /// `x` is the node that took the spliced position and may be absent;
    /// its parent is carried explicitly, which is the whole job the
    /// parented sentinel performed in pointer-based formulations.
    fn delete_fixup(&mut self, mut x: Option<Handle>, mut parent: Option<Handle>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else { break };
            if x == self.node(p).left {
                let mut sibling = self.node(p).right.expect("black-height gives the fix-up position a sibling");
                if self.node(sibling).color == Color::Red {
                    self.node_mut(sibling).color = Color::Black;
                    self.node_mut(p).color = Color::Red;
                    self.rotate_left(p);
                    sibling = self.node(p).right.expect("rotation keeps a sibling in place");
                }
                let near = self.node(sibling).left;
                let far = self.node(sibling).right;
                if !self.is_red(near) && !self.is_red(far) {
                    self.node_mut(sibling).color = Color::Red;
                    x = Some(p);
                    parent = self.node(p).parent;
                } else {
                    if !self.is_red(far) {
                        if let Some(h) = near {
                            self.node_mut(h).color = Color::Black;
                        }
                        self.node_mut(sibling).color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = self.node(p).right.expect("rotation keeps a sibling in place");
                    }
                    let parent_color = self.node(p).color;
                    self.node_mut(sibling).color = parent_color;
                    self.node_mut(p).color = Color::Black;
                    if let Some(h) = self.node(sibling).right {
                        self.node_mut(h).color = Color::Black;
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self.node(p).left.expect("black-height gives the fix-up position a sibling");
                if self.node(sibling).color == Color::Red {
                    self.node_mut(sibling).color = Color::Black;
                    self.node_mut(p).color = Color::Red;
                    self.rotate_right(p);
                    sibling = self.node(p).left.expect("rotation keeps a sibling in place");
                }
                let near = self.node(sibling).right;
                let far = self.node(sibling).left;
                if !self.is_red(near) && !self.is_red(far) {
                    self.node_mut(sibling).color = Color::Red;
                    x = Some(p);
                    parent = self.node(p).parent;
                } else {
                    if !self.is_red(far) {
                        if let Some(h) = near {
                            self.node_mut(h).color = Color::Black;
                        }
                        self.node_mut(sibling).color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = self.node(p).left.expect("rotation keeps a sibling in place");
                    }
                    let parent_color = self.node(p).color;
                    self.node_mut(sibling).color = parent_color;
                    self.node_mut(p).color = Color::Black;
                    if let Some(h) = self.node(sibling).left {
                        self.node_mut(h).color = Color::Black;
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        if let Some(h) = x {
            self.node_mut(h).color = Color::Black;
        }
    }
}

impl<K: Ord, V> RawRedBlackMap<K, V> {
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

    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(RbNode::new(key, value));
            self.node_mut(handle).color = Color::Black;
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

        let mut node = RbNode::new(key, value);
        node.parent = Some(parent);
        let handle = self.nodes.alloc(node);
        if went_left {
            self.node_mut(parent).left = Some(handle);
        } else {
            self.node_mut(parent).right = Some(handle);
        }
        self.len += 1;
        self.insert_fixup(handle);
        debug_assert_eq!(self.nodes.len(), self.len);
        None
    }

    /// Removes `key` if present, tracking the color of the node actually
    /// spliced out of the tree; losing a Black node breaks the
    /// black-height invariant and triggers the fix-up at the splice point.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.search(key)?;
        let left = self.node(node).left;
        let right = self.node(node).right;

        let (spliced_color, fix, fix_parent) = match (left, right) {
            (None, _) => {
                let color = self.node(node).color;
                let parent = self.node(node).parent;
                self.transplant(node, right);
                (color, right, parent)
            }
            (_, None) => {
                let color = self.node(node).color;
                let parent = self.node(node).parent;
                self.transplant(node, left);
                (color, left, parent)
            }
            (Some(left), Some(right)) => {
                // Relink the in-order successor into the removed node's
                // position; the successor keeps its own key and value.
                let succ = self.minimum(right);
                let color = self.node(succ).color;
                let fix = self.node(succ).right;
                let fix_parent = if self.node(succ).parent == Some(node) {
                    Some(succ)
                } else {
                    let succ_parent = self.node(succ).parent;
                    let succ_right = self.node(succ).right;
                    self.transplant(succ, succ_right);
                    self.node_mut(succ).right = Some(right);
                    self.node_mut(right).parent = Some(succ);
                    succ_parent
                };
                self.node_mut(succ).left = Some(left);
                self.node_mut(left).parent = Some(succ);
                self.transplant(node, Some(succ));
                let node_color = self.node(node).color;
                self.node_mut(succ).color = node_color;
                (color, fix, fix_parent)
            }
        };

        let removed = self.nodes.take(node);
        self.len -= 1;
        if spliced_color == Color::Black {
            self.delete_fixup(fix, fix_parent);
        }
        Some(removed.value)
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.key_value(self.minimum(root)))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.key_value(self.maximum(root)))
    }

    /// Least key `>=` the probe (`inclusive`) or `>` it (not).
    fn seek_forward<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            let in_range = match key.cmp(node.key.borrow()) {
                Ordering::Less => true,
                Ordering::Equal => inclusive,
                Ordering::Greater => false,
            };
            if in_range {
                best = Some(h);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        best
    }

    /// Greatest key `<=` the probe (`inclusive`) or `<` it (not).
    fn seek_backward<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            let in_range = match key.cmp(node.key.borrow()) {
                Ordering::Greater => true,
                Ordering::Equal => inclusive,
                Ordering::Less => false,
            };
            if in_range {
                best = Some(h);
                current = node.right;
            } else {
                current = node.left;
            }
        }
        best
    }

    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.seek_forward(key, true).map(|h| self.key_value(h))
    }

    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.seek_backward(key, true).map(|h| self.key_value(h))
    }

    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.seek_backward(key, false).map(|h| self.key_value(h))
    }

    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.seek_forward(key, false).map(|h| self.key_value(h))
    }

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
        let mut current = self.seek_forward(from, true);
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

    impl<K: Ord + core::fmt::Debug, V> RawRedBlackMap<K, V> {
        /// Checks the three color invariants plus structural consistency.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "empty tree must have len 0");
                return;
            };
            assert_eq!(self.node(root).color, Color::Black, "root must be Black");
            assert_eq!(self.node(root).parent, None, "root must not have a parent");

            // Iterative post-order; black heights memoized per arena slot.
            let mut black_heights: alloc::collections::BTreeMap<usize, u32> = alloc::collections::BTreeMap::new();
            let black_height_of = |memo: &alloc::collections::BTreeMap<usize, u32>, link: Option<Handle>| match link {
                None => 1,
                Some(h) => memo[&h.to_index()],
            };
            let mut count = 0usize;
            let mut stack = alloc::vec![(root, false)];
            while let Some((h, expanded)) = stack.pop() {
                let node = self.node(h);
                if expanded {
                    count += 1;
                    if node.color == Color::Red {
                        assert!(
                            !self.is_red(node.left) && !self.is_red(node.right),
                            "red node {:?} has a red child",
                            node.key
                        );
                    }
                    let bl = black_height_of(&black_heights, node.left);
                    let br = black_height_of(&black_heights, node.right);
                    assert_eq!(bl, br, "unequal black-heights under {:?}", node.key);
                    let own = if node.color == Color::Black { 1 } else { 0 };
                    black_heights.insert(h.to_index(), bl + own);
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
    fn sequential_inserts_keep_invariants() {
        let mut map: RawRedBlackMap<i32, i32> = RawRedBlackMap::new();
        for i in 0..512 {
            assert_eq!(map.insert(i, i), None);
            map.validate_invariants();
        }
        for i in 0..512 {
            assert_eq!(map.get(&i), Some(&i));
        }
    }

    #[test]
    fn black_leaf_removal_runs_fixup() {
        let mut map = RawRedBlackMap::new();
        // Builds the seven-node tree with Black 4/2/6 and Red leaves.
        for key in [4, 2, 6, 1, 3, 5, 7] {
            map.insert(key, key * 100);
        }
        map.validate_invariants();
        // Red leaves splice out without touching black-heights.
        assert_eq!(map.remove(&1), Some(100));
        assert_eq!(map.remove(&3), Some(300));
        map.validate_invariants();
        // 2 is now a Black leaf; removing it leaves a double-black at its
        // position and the fix-up must rebalance through the sibling.
        assert_eq!(map.remove(&2), Some(200));
        map.validate_invariants();
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn remove_root_with_two_children() {
        let mut map = RawRedBlackMap::new();
        for key in [10, 5, 15, 12, 20] {
            map.insert(key, ());
        }
        assert_eq!(map.remove(&10), Some(()));
        map.validate_invariants();
        let keys: Vec<i32> = map.entries().iter().map(|(k, _)| **k).collect();
        assert_eq!(keys, [5, 12, 15, 20]);
    }

    proptest! {
        #[test]
        fn random_ops_match_model(ops in prop::collection::vec((any::<bool>(), -64i32..64, any::<u8>()), 0..512)) {
            let mut map = RawRedBlackMap::new();
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
