use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;
use core::ops::{Bound, RangeBounds};

use tracing::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::walk::InOrderWalk;

/// The AVL tree backing `AvlTreeMap`.
///
/// Nodes live in an arena and refer to each other by [`Handle`]. Every public
/// mutation leaves the tree satisfying:
///
/// - BST ordering: keys in a left subtree < node key < keys in a right subtree.
/// - AVL balance: child heights differ by at most one.
/// - `height = 1 + max(height(left), height(right))`, absent child counts 0.
/// - `size = 1 + size(left) + size(right)`, absent child counts 0.
/// - A child's `parent` is the node holding it; the root has no parent.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<Handle>,
}

impl<K, V> RawAvlTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Number of entries, read off the root's subtree size.
    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node at once. Parent links are never followed.
    pub(crate) fn clear(&mut self) {
        trace!(len = self.len(), "clearing tree");
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Resolves a handle that may have been released since it was obtained.
    pub(crate) fn try_node(&self, handle: Handle) -> Option<&Node<K, V>> {
        self.nodes.try_get(handle)
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.nodes.get_mut(handle).value
    }

    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (&node.key, &node.value)
    }

    /// Consumes the tree, returning its entries in ascending key order.
    pub(crate) fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let mut walk = InOrderWalk::all(&self);
        let mut entries = Vec::with_capacity(walk.len());
        // The walk has already stepped past a node it yields, so it can be taken.
        while let Some(handle) = walk.next(&self) {
            let node = self.nodes.take(handle);
            entries.push((node.key, node.value));
        }
        entries
    }

    // ─── Structural maintenance ─────────────────────────────────────────────

    #[inline]
    pub(crate) fn height(&self, handle: Option<Handle>) -> u8 {
        handle.map_or(0, |h| self.nodes.get(h).height)
    }

    #[inline]
    pub(crate) fn size(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.nodes.get(h).size)
    }

    fn balance_factor(&self, handle: Handle) -> i16 {
        let node = self.nodes.get(handle);
        i16::from(self.height(node.left)) - i16::from(self.height(node.right))
    }

    /// Recomputes height and size from the children's stored metadata.
    fn refresh_metadata(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left, node.right);
        let height = 1 + self.height(left).max(self.height(right));
        let size = 1 + self.size(left) + self.size(right);

        let node = self.nodes.get_mut(handle);
        node.height = height;
        node.size = size;
    }

    fn child_on(&self, handle: Handle, side: Side) -> Handle {
        self.nodes
            .get(handle)
            .child(side)
            .expect("`RawAvlTree::child_on()` - rotation needs a child on the heavy side!")
    }

    /// Rotates the subtree at `z` towards `direction` and returns its new root.
    ///
    /// The new root inherits `z`'s parent, but the parent's child slot still names
    /// `z`; the caller re-links it.
    fn rotate(&mut self, z: Handle, direction: Side) -> Handle {
        let heavy = direction.opposite();
        let y = self.child_on(z, heavy);
        let inner = self.nodes.get(y).child(direction);
        let parent = self.nodes.get(z).parent;

        self.nodes.get_mut(z).set_child(heavy, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(z);
        }

        let pivot = self.nodes.get_mut(y);
        pivot.set_child(direction, Some(z));
        pivot.parent = parent;
        self.nodes.get_mut(z).parent = Some(y);

        // `z` is now below `y`.
        self.refresh_metadata(z);
        self.refresh_metadata(y);

        trace!(from = ?z, to = ?y, ?direction, "rotated subtree");
        y
    }

    fn rotate_left(&mut self, z: Handle) -> Handle {
        self.rotate(z, Side::Left)
    }

    fn rotate_right(&mut self, z: Handle) -> Handle {
        self.rotate(z, Side::Right)
    }

    /// Restores the AVL balance at `handle` (children must already be balanced)
    /// and returns the root of the resulting subtree.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.refresh_metadata(handle);
        let balance = self.balance_factor(handle);

        let root = if balance > 1 {
            let left = self.child_on(handle, Side::Left);
            if self.balance_factor(left) < 0 {
                let left = self.rotate_left(left);
                self.nodes.get_mut(handle).left = Some(left);
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            let right = self.child_on(handle, Side::Right);
            if self.balance_factor(right) > 0 {
                let right = self.rotate_right(right);
                self.nodes.get_mut(handle).right = Some(right);
            }
            self.rotate_left(handle)
        } else {
            handle
        };

        debug_assert!(self.balance_factor(root).abs() <= 1, "`RawAvlTree::rebalance()` - subtree still unbalanced!");
        root
    }

    /// The slot `child` occupies under `parent`.
    fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.nodes.get(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Rebalances every node from `start` up to the root, innermost first.
    fn retrace(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            let parent = self.nodes.get(handle).parent;
            let side = parent.map(|p| self.side_of(p, handle));
            let subtree = self.rebalance(handle);

            match (parent, side) {
                (Some(parent), Some(side)) => self.nodes.get_mut(parent).set_child(side, Some(subtree)),
                _ => self.root = Some(subtree),
            }
            current = parent;
        }
    }

    /// Unlinks a node with at most one child, promoting that child into its slot.
    /// Returns the former parent and the released node.
    fn splice_out(&mut self, handle: Handle) -> (Option<Handle>, Node<K, V>) {
        let node = self.nodes.get(handle);
        let (child, parent) = (node.only_child(), node.parent);

        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, handle);
                self.nodes.get_mut(parent).set_child(side, child);
            }
            None => self.root = child,
        }

        trace!(node = ?handle, ?parent, "released node");
        (parent, self.nodes.take(handle))
    }

    /// Removes the entry stored at `handle`.
    ///
    /// A node with two children is not released: it takes over its in-order
    /// successor's entry and the successor's slot is released instead.
    pub(crate) fn remove_at(&mut self, handle: Handle) -> (K, V) {
        let node = self.nodes.get(handle);
        let (removed, retrace_from) = if let (Some(_), Some(right)) = (node.left, node.right) {
            let successor = self.extreme(right, Side::Left);
            let (retrace_from, successor) = self.splice_out(successor);

            let target = self.nodes.get_mut(handle);
            let key = mem::replace(&mut target.key, successor.key);
            let value = mem::replace(&mut target.value, successor.value);
            ((key, value), retrace_from)
        } else {
            let (retrace_from, node) = self.splice_out(handle);
            ((node.key, node.value), retrace_from)
        };

        self.retrace(retrace_from);
        if let Some(root) = self.root {
            self.nodes.get_mut(root).parent = None;
        }
        removed
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Follows `side` links from `handle` as far as they go.
    pub(crate) fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// The in-order neighbour of `handle` towards `side`: the successor for
    /// [`Side::Right`], the predecessor for [`Side::Left`].
    pub(crate) fn neighbor(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.nodes.get(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut current = handle;
        let mut parent = self.nodes.get(current).parent;
        while let Some(p) = parent {
            if self.nodes.get(p).child(side) != Some(current) {
                break;
            }
            current = p;
            parent = self.nodes.get(p).parent;
        }
        parent
    }

    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    /// Zero-based position of the node at `handle`, found by climbing to the root.
    pub(crate) fn rank_at(&self, handle: Handle) -> usize {
        let mut rank = self.size(self.nodes.get(handle).left);
        let mut current = handle;
        while let Some(parent) = self.nodes.get(current).parent {
            let node = self.nodes.get(parent);
            if node.right == Some(current) {
                rank += self.size(node.left) + 1;
            }
            current = parent;
        }
        rank
    }

    /// The node at zero-based position `rank`, if `rank < len`.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<Handle> {
        let mut current = self.root;
        let mut remaining = rank;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_size = self.size(node.left);
            match remaining.cmp(&left_size) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(handle),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    current = node.right;
                }
            }
        }
        None
    }
}

impl<K: Ord, V> RawAvlTree<K, V> {
    /// Inserts `key`, or overwrites its value in place when already present.
    /// Returns `true` if a new node was created.
    pub(crate) fn insert(&mut self, key: K, value: V) -> bool {
        let Some(mut current) = self.root else {
            let handle = self.nodes.alloc(Node::leaf(key, value, None));
            trace!(node = ?handle, "inserted root");
            self.root = Some(handle);
            return true;
        };

        loop {
            let node = self.nodes.get_mut(current);
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    // Same key: nothing structural changes.
                    node.value = value;
                    return false;
                }
            };

            match node.child(side) {
                Some(child) => current = child,
                None => {
                    let leaf = self.nodes.alloc(Node::leaf(key, value, Some(current)));
                    self.nodes.get_mut(current).set_child(side, Some(leaf));
                    trace!(node = ?leaf, parent = ?current, ?side, "inserted node");
                    self.retrace(Some(current));
                    return true;
                }
            }
        }
    }
}

impl<K, V> RawAvlTree<K, V> {
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_at(handle))
    }

    /// Smallest key `>= key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => {
                    candidate = Some(handle);
                    current = node.left;
                }
                Ordering::Greater => current = node.right,
            }
        }
        candidate
    }

    /// Largest key `<= key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    candidate = Some(handle);
                    current = node.right;
                }
            }
        }
        candidate
    }

    /// Smallest key `> key`.
    pub(crate) fn higher<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if key.cmp(node.key.borrow()).is_lt() {
                candidate = Some(handle);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        candidate
    }

    /// Largest key `< key`.
    pub(crate) fn lower<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if key.cmp(node.key.borrow()).is_le() {
                current = node.left;
            } else {
                candidate = Some(handle);
                current = node.right;
            }
        }
        candidate
    }

    /// Number of keys strictly less than `key`, whether or not `key` is present.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return rank + self.size(node.left),
                Ordering::Greater => {
                    rank += self.size(node.left) + 1;
                    current = node.right;
                }
            }
        }
        rank
    }

    /// Number of keys less than or equal to `key`.
    fn rank_inclusive<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return rank + self.size(node.left) + 1,
                Ordering::Greater => {
                    rank += self.size(node.left) + 1;
                    current = node.right;
                }
            }
        }
        rank
    }

    /// Starts an in-order walk over the keys within `range`.
    pub(crate) fn walk_range<Q, R>(&self, range: &R) -> InOrderWalk
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
        R: RangeBounds<Q>,
    {
        let start = match range.start_bound() {
            Bound::Included(key) => self.rank(key),
            Bound::Excluded(key) => self.rank_inclusive(key),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(key) => self.rank_inclusive(key),
            Bound::Excluded(key) => self.rank(key),
            Bound::Unbounded => self.len(),
        };

        let start_bound = range.start_bound();
        InOrderWalk::from_root(self, end.saturating_sub(start), |key: &K| match start_bound {
            Bound::Included(start) => start.cmp(key.borrow()).is_gt(),
            Bound::Excluded(start) => start.cmp(key.borrow()).is_ge(),
            Bound::Unbounded => false,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawAvlTree<K, V> {
        /// Checks every structural invariant, panicking with the full list of
        /// violations if any is broken.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            match self.root {
                None => {
                    if self.nodes.len() != 0 {
                        errors.push(alloc::format!("empty tree still owns {} nodes", self.nodes.len()));
                    }
                }
                Some(root) => {
                    if let Some(parent) = self.nodes.get(root).parent {
                        errors.push(alloc::format!("root {root:?} has parent {parent:?}"));
                    }
                    let mut keys: Vec<&K> = Vec::new();
                    let (_, size) = self.validate_node(root, &mut keys, &mut errors);
                    if size != self.nodes.len() {
                        errors.push(alloc::format!("root size {size} but arena holds {}", self.nodes.len()));
                    }
                    for pair in keys.windows(2) {
                        if pair[0] >= pair[1] {
                            errors.push(alloc::format!("keys out of order: {:?} then {:?}", pair[0], pair[1]));
                        }
                    }
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the recomputed `(height, size)` of the subtree at `handle`.
        fn validate_node<'a>(&'a self, handle: Handle, keys: &mut Vec<&'a K>, errors: &mut Vec<String>) -> (u8, usize) {
            let node = self.nodes.get(handle);

            let measure = |child: Option<Handle>, keys: &mut Vec<&'a K>, errors: &mut Vec<String>| match child {
                None => (0, 0),
                Some(child) => {
                    if self.nodes.get(child).parent != Some(handle) {
                        errors.push(alloc::format!(
                            "child {child:?} of {handle:?} points at parent {:?}",
                            self.nodes.get(child).parent
                        ));
                    }
                    self.validate_node(child, keys, errors)
                }
            };

            let (left_height, left_size) = measure(node.left, keys, errors);
            keys.push(&node.key);
            let (right_height, right_size) = measure(node.right, keys, errors);

            let height = 1 + left_height.max(right_height);
            let size = 1 + left_size + right_size;
            if node.height != height {
                errors.push(alloc::format!("{handle:?} stores height {} but is {height}", node.height));
            }
            if node.size != size {
                errors.push(alloc::format!("{handle:?} stores size {} but is {size}", node.size));
            }
            if (i16::from(left_height) - i16::from(right_height)).abs() > 1 {
                errors.push(alloc::format!("{handle:?} unbalanced: left {left_height}, right {right_height}"));
            }
            (height, size)
        }

        fn keys_in_order(&self) -> Vec<&K> {
            let mut walk = InOrderWalk::all(self);
            let mut keys = Vec::new();
            while let Some(handle) = walk.next(self) {
                keys.push(&self.node(handle).key);
            }
            keys
        }
    }

    fn tree_from(keys: &[i32]) -> RawAvlTree<i32, i32> {
        let mut tree = RawAvlTree::new();
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree.validate_invariants();
        tree
    }

    fn key_at(tree: &RawAvlTree<i32, i32>, handle: Option<Handle>) -> Option<i32> {
        handle.map(|h| tree.node(h).key)
    }

    #[test]
    fn ascending_inserts_rotate_left() {
        let tree = tree_from(&[1, 2, 3]);
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).key, 2);
        assert_eq!(tree.node(root).height, 2);
        assert_eq!(key_at(&tree, tree.node(root).left), Some(1));
        assert_eq!(key_at(&tree, tree.node(root).right), Some(3));
    }

    #[test]
    fn zig_zag_inserts_double_rotate() {
        let left_right = tree_from(&[30, 10, 20]);
        assert_eq!(key_at(&left_right, left_right.root()), Some(20));

        let right_left = tree_from(&[10, 30, 20]);
        assert_eq!(key_at(&right_left, right_left.root()), Some(20));
    }

    #[test]
    fn duplicate_insert_overwrites_without_new_node() {
        let mut tree = tree_from(&[1, 2, 3]);
        assert!(!tree.insert(2, 99));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(tree.search(&2).unwrap()).value, 99);
        tree.validate_invariants();
    }

    #[test]
    fn two_child_remove_keeps_matched_slot() {
        let mut tree = tree_from(&[20, 10, 30, 25, 35]);
        let matched = tree.search(&30).unwrap();
        let successor = tree.search(&35).unwrap();

        assert_eq!(tree.remove_entry(&30), Some((30, 300)));
        tree.validate_invariants();

        assert_eq!(tree.node(matched).key, 35);
        assert_eq!(tree.node(matched).value, 350);
        assert!(tree.try_node(successor).is_none());
    }

    #[test]
    fn remove_root_clears_parent_of_new_root() {
        let mut tree = tree_from(&[2, 1]);
        assert!(tree.remove_entry(&2).is_some());
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).key, 1);
        assert_eq!(tree.node(root).parent, None);
        tree.validate_invariants();
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let mut tree = tree_from(&[1, 2, 3]);
        assert_eq!(tree.remove_entry(&4), None);
        assert_eq!(tree.len(), 3);
        tree.validate_invariants();
    }

    #[test]
    fn neighbors_cross_subtrees() {
        let tree = tree_from(&[20, 10, 30, 5, 15, 25, 35]);
        let at = |key| tree.search(&key).unwrap();

        assert_eq!(key_at(&tree, tree.successor(at(15))), Some(20));
        assert_eq!(key_at(&tree, tree.predecessor(at(25))), Some(20));
        assert_eq!(key_at(&tree, tree.successor(at(20))), Some(25));
        assert_eq!(key_at(&tree, tree.predecessor(at(20))), Some(15));
        assert_eq!(tree.successor(at(35)), None);
        assert_eq!(tree.predecessor(at(5)), None);
    }

    #[test]
    fn bounded_queries_on_three_keys() {
        let tree = tree_from(&[10, 20, 30]);
        assert_eq!(key_at(&tree, tree.ceiling(&15)), Some(20));
        assert_eq!(key_at(&tree, tree.ceiling(&20)), Some(20));
        assert_eq!(tree.ceiling(&40), None);
        assert_eq!(key_at(&tree, tree.floor(&25)), Some(20));
        assert_eq!(tree.floor(&5), None);
        assert_eq!(key_at(&tree, tree.higher(&20)), Some(30));
        assert_eq!(tree.higher(&30), None);
        assert_eq!(key_at(&tree, tree.lower(&20)), Some(10));
        assert_eq!(tree.lower(&10), None);
    }

    #[test]
    fn rank_counts_strictly_smaller_keys() {
        let tree = tree_from(&[10, 20, 30, 40, 50]);
        assert_eq!(tree.rank(&25), 2);
        assert_eq!(tree.rank(&10), 0);
        assert_eq!(tree.rank(&60), 5);
        assert_eq!(tree.rank(&5), 0);
        assert_eq!(key_at(&tree, tree.get_by_rank(3)), Some(40));
        assert_eq!(tree.get_by_rank(5), None);
    }

    #[test]
    fn walk_range_counts_entries() {
        let tree = tree_from(&[10, 20, 30, 40, 50]);
        assert_eq!(tree.walk_range(&(15..45)).len(), 3);
        assert_eq!(tree.walk_range(&(20..=40)).len(), 3);
        assert_eq!(tree.walk_range::<i32, _>(&(..)).len(), 5);
        assert_eq!(tree.walk_range(&(60..)).len(), 0);
        assert_eq!(
            tree.walk_range(&(Bound::Excluded(20), Bound::Included(50))).len(),
            3
        );
    }

    #[test]
    fn walk_range_with_no_admissible_key_is_empty() {
        let tree = tree_from(&[10, 20, 30, 40, 50]);
        assert_eq!(tree.walk_range(&(45..15)).len(), 0);
        assert_eq!(tree.walk_range(&(40..=20)).len(), 0);
        assert_eq!(tree.walk_range(&(30..30)).len(), 0);
        assert_eq!(tree.walk_range(&(Bound::Excluded(30), Bound::Excluded(30))).len(), 0);
        assert_eq!(tree.walk_range(&(Bound::Excluded(30), Bound::Included(30))).len(), 0);
    }

    #[test]
    fn rank_inclusive_counts_equal_key() {
        let tree = tree_from(&[10, 20, 30, 40, 50]);
        assert_eq!(tree.rank_inclusive(&30), 3);
        assert_eq!(tree.rank_inclusive(&35), 3);
        assert_eq!(tree.rank_inclusive(&5), 0);
        assert_eq!(tree.rank_inclusive(&50), 5);
        assert_eq!(tree.rank_inclusive(&60), 5);
    }

    #[test]
    fn into_sorted_vec_drains_in_order() {
        let tree = tree_from(&[3, 1, 2]);
        assert_eq!(tree.into_sorted_vec(), vec![(1, 10), (2, 20), (3, 30)]);

        let keys: Vec<i32> = (0..200).map(|i| (i * 37) % 211).collect();
        let mut expected: Vec<(i32, i32)> = keys.iter().map(|&k| (k, k * 10)).collect();
        expected.sort_unstable();
        assert_eq!(tree_from(&keys).into_sorted_vec(), expected);
    }

    #[test]
    fn clear_releases_every_node() {
        let mut tree = tree_from(&[1, 2, 3, 4]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        tree.validate_invariants();
    }

    #[test]
    fn thousand_keys_removed_in_scrambled_order() {
        // Multiplying by a unit mod 1009 permutes 0..1009.
        let keys: Vec<i32> = (0..1000).map(|i| (i * 389) % 1009).collect();
        let mut tree = RawAvlTree::new();
        for &key in &keys {
            assert!(tree.insert(key, key));
        }
        tree.validate_invariants();
        assert_eq!(tree.len(), 1000);

        let mut order = keys.clone();
        order.sort_by_key(|&k| (k * 577) % 1009);
        for key in order {
            assert_eq!(tree.remove_entry(&key), Some((key, key)));
            tree.validate_invariants();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..500).prop_map(Op::Insert),
            2 => (0i32..500).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_mutation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawAvlTree<i32, i32> = RawAvlTree::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let inserted = tree.insert(key, key * 2);
                        prop_assert_eq!(inserted, model.insert(key, key * 2).is_none());
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_entry(&key), model.remove_entry(&key));
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let expected: Vec<&i32> = model.keys().collect();
            prop_assert_eq!(tree.keys_in_order(), expected);
        }

        #[test]
        fn rank_and_get_by_rank_agree(keys in prop::collection::btree_set(-1000i32..1000, 1..200)) {
            let keys: Vec<i32> = keys.into_iter().collect();
            let tree = tree_from(&keys);

            for (position, key) in keys.iter().enumerate() {
                let handle = tree.get_by_rank(position).unwrap();
                prop_assert_eq!(tree.node(handle).key, *key);
                prop_assert_eq!(tree.rank(key), position);
                prop_assert_eq!(tree.rank_at(handle), position);
            }
            prop_assert!(tree.get_by_rank(keys.len()).is_none());
        }

        #[test]
        fn neighbors_match_sorted_order(keys in prop::collection::btree_set(0i32..1000, 1..200), probe in 0i32..1000) {
            let keys: Vec<i32> = keys.into_iter().collect();
            let tree = tree_from(&keys);

            for window in keys.windows(2) {
                let (a, b) = (tree.search(&window[0]).unwrap(), tree.search(&window[1]).unwrap());
                prop_assert_eq!(tree.successor(a), Some(b));
                prop_assert_eq!(tree.predecessor(b), Some(a));
            }

            prop_assert_eq!(key_at(&tree, tree.ceiling(&probe)), keys.iter().copied().find(|&k| k >= probe));
            prop_assert_eq!(key_at(&tree, tree.higher(&probe)), keys.iter().copied().find(|&k| k > probe));
            prop_assert_eq!(key_at(&tree, tree.floor(&probe)), keys.iter().copied().rev().find(|&k| k <= probe));
            prop_assert_eq!(key_at(&tree, tree.lower(&probe)), keys.iter().copied().rev().find(|&k| k < probe));
        }
    }
}
