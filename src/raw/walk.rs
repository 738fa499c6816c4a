use smallvec::SmallVec;

use super::handle::Handle;
use super::raw_avl_tree::RawAvlTree;

/// Explicit-stack in-order traversal state.
///
/// The walk holds no borrow of the tree; every step is handed the tree it was
/// started on. `remaining` is known up front from the order statistics, so the
/// walk stops as soon as the last entry in range has been produced and never
/// descends into a subtree lying past the end of the range.
#[derive(Clone, Debug, Default)]
pub(crate) struct InOrderWalk {
    // AVL height stays below 1.45 * log2(n + 2), so 32 entries stay inline for
    // any tree of fewer than about 4 million nodes.
    stack: SmallVec<[Handle; 32]>,
    remaining: usize,
}

impl InOrderWalk {
    /// Walks every entry of `tree`.
    pub(crate) fn all<K, V>(tree: &RawAvlTree<K, V>) -> Self {
        Self::from_root(tree, tree.len(), |_| false)
    }

    /// Positions the walk at the first entry for which `before_start` is false
    /// and limits it to `remaining` entries.
    ///
    /// `before_start` must hold for a prefix of the key order.
    pub(crate) fn from_root<K, V>(tree: &RawAvlTree<K, V>, remaining: usize, before_start: impl Fn(&K) -> bool) -> Self {
        let mut walk = Self {
            stack: SmallVec::new(),
            remaining,
        };
        if remaining == 0 {
            return walk;
        }

        let mut current = tree.root();
        while let Some(handle) = current {
            let node = tree.node(handle);
            if before_start(&node.key) {
                // The node and its whole left subtree precede the range.
                current = node.right;
            } else {
                walk.stack.push(handle);
                current = node.left;
            }
        }
        walk
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }

    pub(crate) fn next<K, V>(&mut self, tree: &RawAvlTree<K, V>) -> Option<Handle> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.stack.pop()?;
        self.remaining -= 1;

        if self.remaining > 0 {
            self.push_left_spine(tree, tree.node(handle).right);
        } else {
            self.stack.clear();
        }
        Some(handle)
    }

    fn push_left_spine<K, V>(&mut self, tree: &RawAvlTree<K, V>, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = tree.node(handle).left;
        }
    }
}
