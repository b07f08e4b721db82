//! An ordered map built on [`BinaryTree`], along with its iterators.

use std::borrow::Borrow;
use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::mem;

use super::{BinaryTree, PairKey, Search};
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// An ordered map with unique keys, backed by an unbalanced [`BinaryTree`] of `(key, value)` pairs.
///
/// # Examples
/// ```
/// # use shared_lib::collections::binary_tree::TreeMap;
/// let mut map = TreeMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// assert_eq!(map.insert("b", 20), Some(2));
/// assert_eq!(map.get("b"), Some(&20));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
/// ```
pub struct TreeMap<K, V> {
    tree: BinaryTree<(K, V), PairKey>,
}

impl<K, V> TreeMap<K, V> {
    pub const fn new() -> TreeMap<K, V> {
        TreeMap {
            tree: BinaryTree::with_extractor(PairKey),
        }
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.get(self.tree.first()?).map(|(k, v)| (k, v))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.get(self.tree.last()?).map(|(k, v)| (k, v))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    pub fn clear(&mut self) {
        self.tree.clear()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.into_iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Inserts a value under `key`, returning the value it replaced, if any. The original key is
    /// kept when replacing.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.try_insert(key, value).throw()
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        match self.tree.search(&key) {
            Search::Found(id) => {
                let Some(entry) = self.tree.get_mut(id) else {
                    unreachable!("A node returned by search is in the tree.")
                };
                Ok(Some(mem::replace(&mut entry.1, value)))
            },
            Search::Vacant(hint) => {
                self.tree.try_insert_after_search((key, value), hint)?;
                Ok(None)
            },
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(self.tree.find(key)?).map(|(k, v)| (k, v))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(key)?;
        self.tree.get_mut(id).map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(key)?;
        self.tree.remove(id)
    }
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Debug, V: Debug> Debug for TreeMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);

    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter(self.tree.iter())
    }
}

/// A borrowed iterator over the entries of a [`TreeMap`] in key order.
pub struct Iter<'a, K, V>(super::Iter<'a, (K, V), PairKey>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`TreeMap`] in order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`TreeMap`] in key order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);

    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.tree.into_iter())
    }
}

/// An owned iterator over the entries of a [`TreeMap`] in key order.
pub struct IntoIter<K, V>(super::IntoIter<(K, V), PairKey>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
