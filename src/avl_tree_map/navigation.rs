use core::borrow::Borrow;

use super::{AvlTreeMap, NodeRef};

impl<K, V> AvlTreeMap<K, V> {
    /// Returns the node holding `key`, if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(20, "twenty")]);
    /// let node = map.search(&20).unwrap();
    /// assert_eq!(node.value(), &"twenty");
    /// assert!(map.search(&21).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        NodeRef::from_handle(&self.raw, self.raw.search(key))
    }

    /// Returns the node with the smallest key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// assert!(map.first().is_none());
    /// map.insert(20, ());
    /// map.insert(10, ());
    /// assert_eq!(map.first().map(|n| *n.key()), Some(10));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::from_handle(&self.raw, self.raw.first())
    }

    /// Returns the node with the largest key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(20, ()), (30, ())]);
    /// assert_eq!(map.last().map(|n| *n.key()), Some(30));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::from_handle(&self.raw, self.raw.last())
    }

    /// Returns the first key-value pair in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.first_key_value(), Some((&1, &"a")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.key_value(handle))
    }

    /// Returns the last key-value pair in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.last_key_value(), Some((&2, &"b")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.key_value(handle))
    }

    /// Returns the node with the smallest key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.ceiling(&15).map(|n| *n.key()), Some(20));
    /// assert_eq!(map.ceiling(&20).map(|n| *n.key()), Some(20));
    /// assert!(map.ceiling(&40).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn ceiling<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        NodeRef::from_handle(&self.raw, self.raw.ceiling(key))
    }

    /// Returns the node with the largest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.floor(&25).map(|n| *n.key()), Some(20));
    /// assert_eq!(map.floor(&20).map(|n| *n.key()), Some(20));
    /// assert!(map.floor(&5).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn floor<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        NodeRef::from_handle(&self.raw, self.raw.floor(key))
    }

    /// Returns the node with the smallest key strictly greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.higher(&15).map(|n| *n.key()), Some(20));
    /// assert_eq!(map.higher(&20).map(|n| *n.key()), Some(30));
    /// assert!(map.higher(&30).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn higher<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        NodeRef::from_handle(&self.raw, self.raw.higher(key))
    }

    /// Returns the node with the largest key strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_ost::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(map.lower(&15).map(|n| *n.key()), Some(10));
    /// assert_eq!(map.lower(&20).map(|n| *n.key()), Some(10));
    /// assert!(map.lower(&10).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn lower<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        NodeRef::from_handle(&self.raw, self.raw.lower(key))
    }
}
