use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::{Arena, Handle};

/// Node of the splay tree: no parent link, no balance metadata. The shape
/// is whatever the access history left behind.
#[derive(Clone)]
pub(crate) struct SplayNode<K, V> {
    key: K,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> SplayNode<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }
}

/// The self-adjusting core backing `SplayMap`.
///
/// Every `get`/`insert`/`remove` first performs a top-down splay of the
/// probed key, which moves it (or the last node on its search path) to the
/// root. Lookups therefore take `&mut self`; amortized cost is logarithmic
/// over any operation sequence even though single operations may be linear.
#[derive(Clone)]
pub(crate) struct RawSplayMap<K, V> {
    nodes: Arena<SplayNode<K, V>>,
    root: Option<Handle>,
    len: usize,
}

impl<K, V> RawSplayMap<K, V> {
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
    fn node(&self, handle: Handle) -> &SplayNode<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut SplayNode<K, V> {
        self.nodes.get_mut(handle)
    }

    fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (&node.key, &node.value)
    }
}

impl<K: Ord, V> RawSplayMap<K, V> {
    /// Top-down splay of `key` to the root.
    ///
    /// Nodes passed on the way down are collected into two track chains:
    /// everything known to be smaller than the final root hangs off
    /// `left_tail` (linked through right children), everything larger off
    /// `right_tail` (linked through left children). A zig-zig step (two
    /// consecutive descents in the same direction) is flattened with one
    /// rotation before the node is linked away; this is what bounds the
    /// amortized cost. The descent stops at the key or at the nearest node
    /// when the key is absent, and the tracks are reassembled as the new
    /// root's subtrees.
    fn splay<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut node) = self.root else { return };
        let mut left_root: Option<Handle> = None;
        let mut left_tail: Option<Handle> = None;
        let mut right_root: Option<Handle> = None;
        let mut right_tail: Option<Handle> = None;

        loop {
            match key.cmp(self.node(node).key.borrow()) {
                Ordering::Less => {
                    let Some(mut child) = self.node(node).left else { break };
                    if key.cmp(self.node(child).key.borrow()) == Ordering::Less {
                        // zig-zig: rotate right at `node` before linking.
                        self.node_mut(node).left = self.node(child).right;
                        self.node_mut(child).right = Some(node);
                        node = child;
                        match self.node(node).left {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    // `node` and its right subtree are all greater than the
                    // eventual root: link right.
                    match right_tail {
                        None => right_root = Some(node),
                        Some(tail) => self.node_mut(tail).left = Some(node),
                    }
                    right_tail = Some(node);
                    node = child;
                }
                Ordering::Greater => {
                    let Some(mut child) = self.node(node).right else { break };
                    if key.cmp(self.node(child).key.borrow()) == Ordering::Greater {
                        // zig-zig: rotate left at `node` before linking.
                        self.node_mut(node).right = self.node(child).left;
                        self.node_mut(child).left = Some(node);
                        node = child;
                        match self.node(node).right {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    // Link left: smaller than the eventual root.
                    match left_tail {
                        None => left_root = Some(node),
                        Some(tail) => self.node_mut(tail).right = Some(node),
                    }
                    left_tail = Some(node);
                    node = child;
                }
                Ordering::Equal => break,
            }
        }

        // Reassemble: the final node's own subtrees go on the track tails,
        // and the tracks become its new subtrees.
        let node_left = self.node(node).left;
        let node_right = self.node(node).right;
        match left_tail {
            None => left_root = node_left,
            Some(tail) => self.node_mut(tail).right = node_left,
        }
        match right_tail {
            None => right_root = node_right,
            Some(tail) => self.node_mut(tail).left = node_right,
        }
        self.node_mut(node).left = left_root;
        self.node_mut(node).right = right_root;
        self.root = Some(node);
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.root?;
        self.splay(key);
        let root = self.root.expect("splay keeps a non-empty tree rooted");
        let node = self.node(root);
        (node.key.borrow() == key).then(|| &node.value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.root?;
        self.splay(key);
        let root = self.root.expect("splay keeps a non-empty tree rooted");
        if self.node(root).key.borrow() == key {
            Some(&mut self.node_mut(root).value)
        } else {
            None
        }
    }

    pub(crate) fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).is_some()
    }

    /// Inserts or replaces. A fresh key becomes the new root, with the old
    /// root hung on whichever side the comparison indicates.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.root.is_none() {
            let handle = self.nodes.alloc(SplayNode::new(key, value));
            self.root = Some(handle);
            self.len = 1;
            return None;
        }
        self.splay(&key);
        let root = self.root.expect("splay keeps a non-empty tree rooted");
        let replaced = match key.cmp(&self.node(root).key) {
            Ordering::Equal => Some(core::mem::replace(&mut self.node_mut(root).value, value)),
            Ordering::Less => {
                let mut node = SplayNode::new(key, value);
                node.left = self.node(root).left;
                node.right = Some(root);
                self.node_mut(root).left = None;
                self.root = Some(self.nodes.alloc(node));
                self.len += 1;
                None
            }
            Ordering::Greater => {
                let mut node = SplayNode::new(key, value);
                node.right = self.node(root).right;
                node.left = Some(root);
                self.node_mut(root).right = None;
                self.root = Some(self.nodes.alloc(node));
                self.len += 1;
                None
            }
        };
        debug_assert_eq!(self.nodes.len(), self.len);
        replaced
    }

    /// Removes `key` if present: splay it to the root, detach, then splay
    /// the left subtree to bring its maximum up and reattach the right
    /// subtree under it.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.root?;
        self.splay(key);
        let root = self.root.expect("splay keeps a non-empty tree rooted");
        if self.node(root).key.borrow() != key {
            return None;
        }
        let left = self.node(root).left;
        let right = self.node(root).right;
        let removed = self.nodes.take(root);
        match left {
            None => self.root = right,
            Some(left) => {
                self.root = Some(left);
                // Every key in the left subtree is smaller than the removed
                // key, so this splay surfaces the subtree maximum, which has
                // no right child.
                self.splay(key);
                let new_root = self.root.expect("splay keeps a non-empty tree rooted");
                self.node_mut(new_root).right = right;
            }
        }
        self.len -= 1;
        Some(removed.value)
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut current = self.root?;
        while let Some(left) = self.node(current).left {
            current = left;
        }
        Some(self.key_value(current))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut current = self.root?;
        while let Some(right) = self.node(current).right {
            current = right;
        }
        Some(self.key_value(current))
    }

    /// Least key `>=` the probe (`inclusive`) or `>` it. Read-only: the
    /// boundary queries deliberately leave the shape alone.
    fn bound_above<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            let qualifies = match node.key.borrow().cmp(key) {
                Ordering::Greater => true,
                Ordering::Equal => inclusive,
                Ordering::Less => false,
            };
            if qualifies {
                best = Some(h);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        best
    }

    /// Greatest key `<=` the probe (`inclusive`) or `<` it.
    fn bound_below<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.node(h);
            let qualifies = match node.key.borrow().cmp(key) {
                Ordering::Less => true,
                Ordering::Equal => inclusive,
                Ordering::Greater => false,
            };
            if qualifies {
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
        self.bound_above(key, true).map(|h| self.key_value(h))
    }

    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_below(key, true).map(|h| self.key_value(h))
    }

    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_below(key, false).map(|h| self.key_value(h))
    }

    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound_above(key, false).map(|h| self.key_value(h))
    }

    /// Ascending snapshot; explicit stack, since splay nodes carry no
    /// parent links and the tree may be arbitrarily deep.
    pub(crate) fn entries(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<Handle> = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(h) = current {
                stack.push(h);
                current = self.node(h).left;
            }
            let h = stack.pop().expect("loop condition guarantees a pending node");
            let node = self.node(h);
            out.push((&node.key, &node.value));
            current = node.right;
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
        let mut stack: Vec<Handle> = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(h) = current {
                let node = self.node(h);
                if node.key.borrow() < from {
                    // This node and its whole left side are below the range.
                    current = node.right;
                } else {
                    stack.push(h);
                    current = node.left;
                }
            }
            let Some(h) = stack.pop() else { break };
            let node = self.node(h);
            if node.key.borrow() >= to {
                break;
            }
            out.push((&node.key, &node.value));
            current = node.right;
        }
        out
    }
}
