use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};

use super::{Arena, Identity, Iter, KeyExtractor, Node, NodeId};
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// An unbalanced binary search tree, ordered by the key that `X` extracts from each value.
///
/// Nodes live in an arena and are linked by index, with each node also pointing to its parent.
/// That makes [`next`](BinaryTree::next) and [`prev`](BinaryTree::prev) possible from any node
/// without a stack. The tree tracks its leftmost and rightmost nodes, so [`first`](BinaryTree::first)
/// and [`last`](BinaryTree::last) are `O(1)`.
///
/// Duplicate keys are allowed. A duplicate is placed after the equal keys already in the subtree it
/// descends into.
///
/// No rebalancing is performed, so inserting keys in sorted order degrades every operation to
/// `O(n)`.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of values in the BinaryTree.
/// - `h`: The height of the tree, between `log2 n` and `n`.
///
/// | Method | Complexity |
/// |-|-|
/// | `find` / `search` | `O(h)` |
/// | `insert` | `O(h)` |
/// | `insert_after_search` | `O(1)`* |
/// | `remove` | `O(h)` |
/// | `next` / `prev` | `O(h)`, `O(1)` amortized over a walk |
/// | `first` / `last` | `O(1)` |
///
/// \* Unless the hinted slot has been filled since the search.
pub struct BinaryTree<T, X = Identity> {
    arena: Arena<T>,
    root: Option<usize>,
    leftmost: Option<usize>,
    rightmost: Option<usize>,
    extractor: X,
}

/// The result of [`BinaryTree::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// A node with an equal key.
    Found(NodeId),
    /// No node has an equal key. The hint records where the key belongs.
    Vacant(InsertHint),
}

/// The insertion point found by a failed [`search`](BinaryTree::search), for use with
/// [`insert_after_search`](BinaryTree::insert_after_search).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertHint {
    parent: Option<NodeId>,
    ordering: Ordering,
}

impl InsertHint {
    /// The last node visited, or [`None`] if the tree was empty.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// How the searched key compared to the parent: [`Less`](Ordering::Less) for the left slot,
    /// [`Greater`](Ordering::Greater) for the right slot, or [`Equal`](Ordering::Equal) if there is
    /// no parent.
    pub const fn ordering(&self) -> Ordering {
        self.ordering
    }
}

impl<T> BinaryTree<T> {
    /// Creates a new, empty BinaryTree ordered by the values themselves.
    pub const fn new() -> BinaryTree<T> {
        Self::with_extractor(Identity)
    }
}

impl<T, X> BinaryTree<T, X> {
    /// Creates a new, empty BinaryTree ordered by the keys that `extractor` returns.
    pub const fn with_extractor(extractor: X) -> BinaryTree<T, X> {
        BinaryTree {
            arena: Arena::new(),
            root: None,
            leftmost: None,
            rightmost: None,
            extractor,
        }
    }

    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn extractor(&self) -> &X {
        &self.extractor
    }

    /// Returns the node with the smallest key.
    pub fn first(&self) -> Option<NodeId> {
        self.leftmost.map(|index| self.arena.id(index))
    }

    /// Returns the node with the largest key.
    pub fn last(&self) -> Option<NodeId> {
        self.rightmost.map(|index| self.arena.id(index))
    }

    /// Returns the in-order successor of `id`, or [`None`] if `id` is the last node or stale.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let index = self.arena.resolve(id)?;
        self.next_index(index).map(|index| self.arena.id(index))
    }

    /// Returns the in-order predecessor of `id`, or [`None`] if `id` is the first node or stale.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let index = self.arena.resolve(id)?;
        self.prev_index(index).map(|index| self.arena.id(index))
    }

    /// Returns a reference to the value of a node, or [`None`] if `id` is stale.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        let index = self.arena.resolve(id)?;
        Some(&self.arena.node(index).value)
    }

    /// Returns a mutable reference to the value of a node, or [`None`] if `id` is stale.
    ///
    /// The key of the value must not be changed in a way that alters its ordering. Doing so
    /// doesn't cause undefined behaviour, but later searches may miss values.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.arena.resolve(id)?;
        Some(&mut self.arena.node_mut(index).value)
    }

    /// Returns true if `id` refers to a node in this tree.
    pub fn contains_id(&self, id: NodeId) -> bool {
        self.arena.resolve(id).is_some()
    }

    /// Removes and returns the value with the smallest key.
    pub fn pop_first(&mut self) -> Option<T> {
        let id = self.first()?;
        self.remove(id)
    }

    /// Removes and returns the value with the largest key.
    pub fn pop_last(&mut self) -> Option<T> {
        let id = self.last()?;
        self.remove(id)
    }

    /// Removes the node `id` from the tree and returns its value. Every other id remains valid.
    ///
    /// Returns [`None`] if `id` is stale.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let index = self.arena.resolve(id)?;

        if self.leftmost == Some(index) {
            self.leftmost = self.next_index(index);
        }
        if self.rightmost == Some(index) {
            self.rightmost = self.prev_index(index);
        }

        let node = self.arena.node(index);
        match (node.left, node.right) {
            (None, right) => self.transplant(index, right),
            (left, None) => self.transplant(index, left),
            (Some(left), Some(right)) => {
                let successor = self.min_index(right);
                if successor != right {
                    // The successor is deeper in the right subtree. It has no left child, so its
                    // right subtree takes its place before it moves up.
                    let successor_right = self.arena.node(successor).right;
                    self.transplant(successor, successor_right);
                    self.arena.node_mut(successor).right = Some(right);
                    self.arena.node_mut(right).parent = Some(successor);
                }
                self.transplant(index, Some(successor));
                self.arena.node_mut(successor).left = Some(left);
                self.arena.node_mut(left).parent = Some(successor);
            },
        }

        Some(self.arena.take(index).value)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
    }

    /// Returns an iterator over the values in key order.
    pub fn iter(&self) -> Iter<'_, T, X> {
        self.into_iter()
    }

    pub(crate) fn first_index(&self) -> Option<usize> {
        self.leftmost
    }

    pub(crate) fn last_index(&self) -> Option<usize> {
        self.rightmost
    }

    pub(crate) fn value(&self, index: usize) -> &T {
        &self.arena.node(index).value
    }

    pub(crate) fn next_index(&self, index: usize) -> Option<usize> {
        if let Some(right) = self.arena.node(index).right {
            return Some(self.min_index(right));
        }

        let mut child = index;
        let mut parent = self.arena.node(index).parent;
        while let Some(current) = parent {
            let node = self.arena.node(current);
            if node.left == Some(child) {
                return Some(current);
            }
            child = current;
            parent = node.parent;
        }
        None
    }

    pub(crate) fn prev_index(&self, index: usize) -> Option<usize> {
        if let Some(left) = self.arena.node(index).left {
            return Some(self.max_index(left));
        }

        let mut child = index;
        let mut parent = self.arena.node(index).parent;
        while let Some(current) = parent {
            let node = self.arena.node(current);
            if node.right == Some(child) {
                return Some(current);
            }
            child = current;
            parent = node.parent;
        }
        None
    }

    fn min_index(&self, mut index: usize) -> usize {
        while let Some(left) = self.arena.node(index).left {
            index = left;
        }
        index
    }

    fn max_index(&self, mut index: usize) -> usize {
        while let Some(right) = self.arena.node(index).right {
            index = right;
        }
        index
    }

    /// Replaces the subtree rooted at `old` with the one rooted at `new`, as seen from `old`'s
    /// parent. `old` keeps its own links.
    fn transplant(&mut self, old: usize, new: Option<usize>) {
        let parent = self.arena.node(old).parent;
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = self.arena.node_mut(parent);
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            },
        }
        if let Some(new) = new {
            self.arena.node_mut(new).parent = parent;
        }
    }
}

impl<T, X: KeyExtractor<T>> BinaryTree<T, X> {
    /// Returns a node with a key equal to `key`, if there is one. With duplicate keys, any one of
    /// the equal nodes may be returned.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::binary_tree::BinaryTree;
    /// let mut tree = BinaryTree::new();
    /// let id = tree.insert(5);
    /// tree.insert(3);
    /// assert_eq!(tree.find(&5), Some(id));
    /// assert_eq!(tree.find(&4), None);
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        X::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(id) => Some(id),
            Search::Vacant(_) => None,
        }
    }

    /// Returns true if a node has a key equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        X::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Searches for `key`, returning either an equal node or the point where `key` would be
    /// inserted. The latter can be passed to
    /// [`insert_after_search`](BinaryTree::insert_after_search) to insert without descending again.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::binary_tree::{BinaryTree, Search};
    /// let mut tree = BinaryTree::new();
    /// tree.insert(10);
    /// match tree.search(&5) {
    ///     Search::Found(_) => unreachable!(),
    ///     Search::Vacant(hint) => {
    ///         tree.insert_after_search(5, hint);
    ///     },
    /// }
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 10]);
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Search
    where
        X::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut current = self.root;

        while let Some(index) = current {
            let node = self.arena.node(index);
            let node_key: &Q = self.extractor.key(&node.value).borrow();
            parent = Some(index);
            if key < node_key {
                ordering = Ordering::Less;
                current = node.left;
            } else if node_key < key {
                ordering = Ordering::Greater;
                current = node.right;
            } else {
                return Search::Found(self.arena.id(index));
            }
        }

        Search::Vacant(InsertHint {
            parent: parent.map(|index| self.arena.id(index)),
            ordering,
        })
    }

    /// Inserts `value`, returning the id of its node. Values with equal keys are kept.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.try_insert(value).throw()
    }

    pub fn try_insert(&mut self, value: T) -> Result<NodeId, AllocError> {
        let (parent, ordering) = self.insertion_point(self.root, &value);
        self.try_attach(value, parent, ordering)
    }

    /// Inserts `value` at the point described by `hint`, which should come from a
    /// [`search`](BinaryTree::search) for the key of `value`.
    ///
    /// If the hinted slot has since been filled, for example by inserting another value with the
    /// same hint, the insertion continues down from that slot instead. A hint whose parent has been
    /// removed falls back to a full descent from the root.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn insert_after_search(&mut self, value: T, hint: InsertHint) -> NodeId {
        self.try_insert_after_search(value, hint).throw()
    }

    pub fn try_insert_after_search(
        &mut self,
        value: T,
        hint: InsertHint,
    ) -> Result<NodeId, AllocError> {
        let parent = match hint.parent {
            None if self.root.is_none() => return self.try_attach(value, None, Ordering::Equal),
            None => None,
            Some(id) => self.arena.resolve(id),
        };
        let Some(parent) = parent else {
            return self.try_insert(value);
        };

        let node = self.arena.node(parent);
        let (ordering, slot) = match hint.ordering {
            Ordering::Less => (Ordering::Less, node.left),
            _ => (Ordering::Greater, node.right),
        };

        match slot {
            None => self.try_attach(value, Some(parent), ordering),
            Some(_) => {
                let (parent, ordering) = self.insertion_point(slot, &value);
                self.try_attach(value, parent, ordering)
            },
        }
    }

    /// Descends from `start` to the empty slot where `value` belongs, returning the slot's parent
    /// and side. Equal keys go right.
    fn insertion_point(&self, start: Option<usize>, value: &T) -> (Option<usize>, Ordering) {
        let key = self.extractor.key(value);
        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut current = start;

        while let Some(index) = current {
            let node = self.arena.node(index);
            parent = Some(index);
            if key < self.extractor.key(&node.value) {
                ordering = Ordering::Less;
                current = node.left;
            } else {
                ordering = Ordering::Greater;
                current = node.right;
            }
        }
        (parent, ordering)
    }

    /// Links a new node holding `value` into the empty slot on the `ordering` side of `parent`.
    fn try_attach(
        &mut self,
        value: T,
        parent: Option<usize>,
        ordering: Ordering,
    ) -> Result<NodeId, AllocError> {
        let index = self.arena.try_alloc(Node::new(value))?;
        self.arena.node_mut(index).parent = parent;

        match parent {
            None => {
                debug_assert!(self.root.is_none());
                self.root = Some(index);
                self.leftmost = Some(index);
                self.rightmost = Some(index);
            },
            Some(parent) if ordering == Ordering::Less => {
                self.arena.node_mut(parent).left = Some(index);
                if self.leftmost == Some(parent) {
                    self.leftmost = Some(index);
                }
            },
            Some(parent) => {
                self.arena.node_mut(parent).right = Some(index);
                if self.rightmost == Some(parent) {
                    self.rightmost = Some(index);
                }
            },
        }

        Ok(self.arena.id(index))
    }
}

impl<T, X: Default> Default for BinaryTree<T, X> {
    fn default() -> Self {
        Self::with_extractor(X::default())
    }
}

impl<T, X: KeyExtractor<T>> Extend<T> for BinaryTree<T, X> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for BinaryTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BinaryTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Debug, X> Debug for BinaryTree<T, X> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
