use crate::avl_tree::node::Node;
use crate::avl_tree::tree;
use crate::avl_tree::{Error, Result};
use log::debug;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Every insertion and removal
/// rebalances the nodes on the path back up to the root, so the height of a tree with `n` values
/// never exceeds roughly `1.44 * log2(n + 2)`.
///
/// Values are unique: inserting a value equal to one already in the tree replaces the stored
/// value and returns the old one.
///
/// # Examples
///
/// ```
/// use avl_collections::{AvlTree, Error};
///
/// let mut tree = AvlTree::new();
/// tree.insert(0);
/// tree.insert(3);
///
/// assert_eq!(tree.len(), 2);
/// assert!(tree.contains(&3));
///
/// assert_eq!(tree.min(), Ok(&0));
/// assert_eq!(tree.max(), Ok(&3));
///
/// assert_eq!(tree.remove(&0), Some(0));
/// assert_eq!(tree.remove(&1), None);
///
/// tree.clear();
/// assert_eq!(tree.min(), Err(Error::EmptyTree));
/// ```
#[derive(Clone)]
pub struct AvlTree<T> {
    tree: tree::Tree<T>,
    len: usize,
}

impl<T> AvlTree<T> {
    /// Constructs a new, empty `AvlTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// ```
    pub fn new() -> Self {
        AvlTree { tree: None, len: 0 }
    }

    /// Inserts a value into the tree. If an equal value already exists in the tree, it will
    /// return and replace the old value.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.insert(1), None);
    /// assert!(tree.contains(&1));
    /// assert_eq!(tree.insert(1), Some(1));
    /// ```
    pub fn insert(&mut self, value: T) -> Option<T>
    where
        T: Ord,
    {
        let AvlTree {
            ref mut tree,
            ref mut len,
        } = self;
        let ret = tree::insert(tree, Node::new(value));
        if ret.is_none() {
            *len += 1;
        }
        ret
    }

    /// Removes a value from the tree. If the value exists in the tree, it will return the removed
    /// value. Otherwise it will return `None` and leave the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let ret = tree::remove(&mut self.tree, key);
        match ret {
            Some(_) => self.len -= 1,
            None => debug!("remove found no matching value among {} values", self.len),
        }
        ret
    }

    /// Checks if a value exists in the tree. Returns `false` for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(!tree.contains(&1));
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the stored value that is equal to a particular key.
    /// Returns `None` if no such value exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(String::from("avl"));
    /// assert_eq!(tree.get("avl"), Some(&String::from("avl")));
    /// assert_eq!(tree.get("splay"), None);
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.tree, key)
    }

    /// Returns the number of values in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the height of the tree. An empty tree has height zero and a single value has
    /// height one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.height(), 0);
    /// tree.extend(vec![1, 2, 3]);
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
    }

    /// Clears the tree, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// tree.clear();
    /// assert_eq!(tree.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        tree::destroy(self.tree.take());
        self.len = 0;
    }

    /// Returns the minimum value of the tree. Returns `Err(Error::EmptyTree)` if the tree is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&T> {
        tree::min(&self.tree).ok_or_else(|| {
            debug!("min requested from an empty tree");
            Error::EmptyTree
        })
    }

    /// Returns the maximum value of the tree. Returns `Err(Error::EmptyTree)` if the tree is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.max(), Ok(&3));
    /// ```
    pub fn max(&self) -> Result<&T> {
        tree::max(&self.tree).ok_or_else(|| {
            debug!("max requested from an empty tree");
            Error::EmptyTree
        })
    }

    /// Calls `visit` on every value of the tree in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    ///
    /// let mut sum = 0;
    /// tree.in_order(|value| sum += *value);
    /// assert_eq!(sum, 3);
    /// ```
    pub fn in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        tree::in_order(&self.tree, &mut visit);
    }

    /// Returns an iterator over the tree. The iterator will yield values using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlTreeIter<T> {
        AvlTreeIter {
            current: &self.tree,
            stack: Vec::new(),
        }
    }

    /// Panics if any cached height is stale, any node is out of balance, any value is out of
    /// order, or the tracked length does not match the number of nodes.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self)
    where
        T: Ord,
    {
        assert_eq!(tree::check_consistency(&self.tree), self.len, "stale length");
    }
}

impl<T> Drop for AvlTree<T> {
    fn drop(&mut self) {
        tree::destroy(self.tree.take());
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type IntoIter = AvlTreeIntoIter<T>;
    type Item = T;

    fn into_iter(mut self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree.take(),
            stack: Vec::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T>
where
    T: 'a,
{
    type IntoIter = AvlTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlTree<T>`.
///
/// This iterator traverses the values of the tree in-order and yields owned values.
pub struct AvlTreeIntoIter<T> {
    current: tree::Tree<T>,
    stack: Vec<Node<T>>,
}

impl<T> Iterator for AvlTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            self.current = node.left.take();
            self.stack.push(*node);
        }
        self.stack.pop().map(|node| {
            let Node { value, right, .. } = node;
            self.current = right;
            value
        })
    }
}

/// An iterator for `AvlTree<T>`.
///
/// This iterator traverses the values of the tree in-order and yields immutable references.
pub struct AvlTreeIter<'a, T>
where
    T: 'a,
{
    current: &'a tree::Tree<T>,
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for AvlTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ref node) = self.current {
            self.current = &node.left;
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = &node.right;
            &node.value
        })
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for AvlTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for AvlTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> PartialEq for AvlTree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &AvlTree<T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlTree<T> where T: Eq {}

impl<T> fmt::Debug for AvlTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Serialize for AvlTree<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct AvlTreeVisitor<T> {
    marker: PhantomData<fn() -> AvlTree<T>>,
}

impl<'de, T> Visitor<'de> for AvlTreeVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = AvlTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of values")
    }

    fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut tree = AvlTree::new();
        while let Some(value) = seq.next_element()? {
            tree.insert(value);
        }
        Ok(tree)
    }
}

impl<'de, T> Deserialize<'de> for AvlTree<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlTreeVisitor {
            marker: PhantomData,
        })
    }
}
