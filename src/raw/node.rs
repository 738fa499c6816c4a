use super::handle::Handle;

/// A key/value entry together with its AVL and order-statistic metadata.
///
/// `left` and `right` are the edges of the logical tree. `parent` points the
/// other way and is only ever read for navigation.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: u8,
    /// Number of nodes in the subtree rooted here, this one included.
    pub(crate) size: usize,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
}

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    pub(crate) const fn leaf(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            height: 1,
            size: 1,
            left: None,
            right: None,
            parent,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// The single child of a node with at most one child.
    pub(crate) fn only_child(&self) -> Option<Handle> {
        debug_assert!(!self.has_two_children(), "`Node::only_child()` - node has two children!");
        self.left.or(self.right)
    }

    pub(crate) const fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn leaf_starts_with_unit_metadata() {
        let node = Node::leaf(5, "five", Some(Handle::from_index(2)));
        assert_eq!(node.height, 1);
        assert_eq!(node.size, 1);
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.child(Side::Right), None);
        assert_eq!(node.parent, Some(Handle::from_index(2)));
    }

    #[test]
    fn child_slots_by_side() {
        let mut node = Node::leaf(1, (), None);
        node.set_child(Side::Right, Some(Handle::from_index(9)));
        assert_eq!(node.right, Some(Handle::from_index(9)));
        assert_eq!(node.only_child(), Some(Handle::from_index(9)));

        node.set_child(Side::Left, Some(Handle::from_index(3)));
        assert!(node.has_two_children());
        assert_eq!(Side::Left.opposite(), Side::Right);
    }
}
