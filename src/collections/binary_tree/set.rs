//! An ordered set built on [`BinaryTree`], along with its iterators.

use std::borrow::Borrow;
use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;

use super::{BinaryTree, Search};
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// An ordered set of unique values, backed by an unbalanced [`BinaryTree`].
///
/// # Examples
/// ```
/// # use shared_lib::collections::binary_tree::TreeSet;
/// let mut set = TreeSet::new();
/// assert!(set.insert(3));
/// assert!(set.insert(1));
/// assert!(!set.insert(3));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3]);
/// ```
pub struct TreeSet<T> {
    tree: BinaryTree<T>,
}

impl<T> TreeSet<T> {
    pub const fn new() -> TreeSet<T> {
        TreeSet {
            tree: BinaryTree::new(),
        }
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the smallest value.
    pub fn first(&self) -> Option<&T> {
        self.tree.get(self.tree.first()?)
    }

    /// Returns the largest value.
    pub fn last(&self) -> Option<&T> {
        self.tree.get(self.tree.last()?)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    pub fn clear(&mut self) {
        self.tree.clear()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }
}

impl<T: Ord> TreeSet<T> {
    /// Adds `value` to the set, returning false if an equal value was already present. In that
    /// case the set is unchanged and `value` is dropped.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn insert(&mut self, value: T) -> bool {
        self.try_insert(value).throw()
    }

    pub fn try_insert(&mut self, value: T) -> Result<bool, AllocError> {
        match self.tree.search(&value) {
            Search::Found(_) => Ok(false),
            Search::Vacant(hint) => {
                self.tree.try_insert_after_search(value, hint)?;
                Ok(true)
            },
        }
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    /// Returns the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(self.tree.find(value)?)
    }

    /// Removes the value equal to `value`, returning true if there was one.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the value equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(value)?;
        self.tree.remove(id)
    }
}

impl<T> Default for TreeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for TreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for TreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = TreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Debug> Debug for TreeSet<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a TreeSet<T> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter(self.tree.iter())
    }
}

/// A borrowed iterator over the values of a [`TreeSet`] in order.
pub struct Iter<'a, T>(super::Iter<'a, T, super::Identity>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> IntoIterator for TreeSet<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.tree.into_iter())
    }
}

/// An owned iterator over the values of a [`TreeSet`] in order.
pub struct IntoIter<T>(super::IntoIter<T, super::Identity>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
