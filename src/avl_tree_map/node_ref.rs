use core::fmt;
use core::ptr;

use super::AvlTreeMap;
use crate::raw::{Handle, RawAvlTree};

/// A stable name for one node of an [`AvlTreeMap`].
///
/// A `NodeId` outlives borrows of the map and can be turned back into a
/// [`NodeRef`] with [`AvlTreeMap::node`]. Inserting other keys and
/// rotations never change which entry a node holds. Removing a key whose node
/// has two children does: that node takes over its successor's entry (see
/// [`AvlTreeMap::remove`]). Once a node is released its slot may be reused by
/// a later insertion.
///
/// # Examples
///
/// ```
/// use avl_ost::AvlTreeMap;
///
/// let mut map = AvlTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let id = map.search(&3).unwrap().id();
///
/// map.insert(4, "d");
/// assert_eq!(map.node(id).map(|n| *n.key()), Some(3));
///
/// map.remove(&3);
/// assert!(map.node(id).is_none());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(Handle);

/// A borrowed view of one entry of an [`AvlTreeMap`], able to walk to its
/// in-order neighbours.
///
/// Obtained from the navigation and order-statistic queries, e.g.
/// [`AvlTreeMap::search`] or [`AvlTreeMap::get_by_rank`]. The borrow ties the
/// reference to the map it came from, so a `NodeRef` can only be used with
/// the tree it belongs to.
pub struct NodeRef<'a, K, V> {
    tree: &'a RawAvlTree<K, V>,
    handle: Handle,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) const fn new(tree: &'a RawAvlTree<K, V>, handle: Handle) -> Self {
        Self { tree, handle }
    }

    /// Wraps a handle returned by a raw query.
    pub(crate) fn from_handle(tree: &'a RawAvlTree<K, V>, handle: Option<Handle>) -> Option<Self> {
        handle.map(|handle| Self::new(tree, handle))
    }

    /// The entry's key.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.tree.node(self.handle).key
    }

    /// The entry's value.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.tree.node(self.handle).value
    }

    #[must_use]
    pub fn key_value(&self) -> (&'a K, &'a V) {
        self.tree.key_value(self.handle)
    }

    /// The node's identity, valid beyond this borrow of the map.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        NodeId(self.handle)
    }

    /// The entry with the next smaller key, if any.
    ///
    /// Descends into the left subtree when there is one, otherwise climbs the
    /// parent links; no search from the root is involved.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// let node = map.search(&20).unwrap();
    /// assert_eq!(node.predecessor().map(|n| *n.key()), Some(10));
    /// assert!(map.first().unwrap().predecessor().is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn predecessor(&self) -> Option<Self> {
        Self::from_handle(self.tree, self.tree.predecessor(self.handle))
    }

    /// The entry with the next larger key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// let node = map.search(&20).unwrap();
    /// assert_eq!(node.successor().map(|n| *n.key()), Some(30));
    /// assert!(map.last().unwrap().successor().is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn successor(&self) -> Option<Self> {
        Self::from_handle(self.tree, self.tree.successor(self.handle))
    }

    /// Zero-based position of this entry in key order.
    ///
    /// This is an order-statistic extension. It climbs the parent links instead
    /// of comparing keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
    /// assert_eq!(map.search("c").unwrap().rank(), 2);
    /// ```
    #[must_use]
    pub fn rank(&self) -> usize {
        self.tree.rank_at(self.handle)
    }
}

impl<K, V> AvlTreeMap<K, V> {
    /// Resolves a [`NodeId`] taken earlier, or `None` if its node has been
    /// released.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::from([(1, "a")]);
    /// let id = map.first().unwrap().id();
    /// *map.get_mut(&1).unwrap() = "z";
    /// assert_eq!(map.node(id).unwrap().value(), &"z");
    /// ```
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K, V>> {
        self.raw.try_node(id.0)?;
        Some(NodeRef::new(&self.raw, id.0))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K, V> PartialEq for NodeRef<'_, K, V> {
    /// Two references are equal when they name the same node of the same map.
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.handle == other.handle
    }
}

impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}
