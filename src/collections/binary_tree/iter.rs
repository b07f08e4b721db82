use std::iter::FusedIterator;

use super::BinaryTree;

impl<'a, T, X> IntoIterator for &'a BinaryTree<T, X> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T, X>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            tree: self,
            front: self.first_index(),
            back: self.last_index(),
            remaining: self.len(),
        }
    }
}

/// A borrowed iterator over the values of a [`BinaryTree`] in key order. Each step follows the
/// parent and child links, so no stack is kept.
pub struct Iter<'a, T, X> {
    tree: &'a BinaryTree<T, X>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T, X> Iterator for Iter<'a, T, X> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        self.remaining -= 1;
        self.front = self.tree.next_index(index);
        Some(self.tree.value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, X> DoubleEndedIterator for Iter<'_, T, X> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        self.remaining -= 1;
        self.back = self.tree.prev_index(index);
        Some(self.tree.value(index))
    }
}

impl<T, X> ExactSizeIterator for Iter<'_, T, X> {}

impl<T, X> FusedIterator for Iter<'_, T, X> {}

impl<T, X> Clone for Iter<'_, T, X> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T, X> IntoIterator for BinaryTree<T, X> {
    type Item = T;

    type IntoIter = IntoIter<T, X>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

/// An owned iterator over the values of a [`BinaryTree`] in key order.
///
/// The smallest node never has a left child, so taking it only ever relinks its right subtree.
pub struct IntoIter<T, X>(BinaryTree<T, X>);

impl<T, X> Iterator for IntoIter<T, X> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<T, X> DoubleEndedIterator for IntoIter<T, X> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_last()
    }
}

impl<T, X> ExactSizeIterator for IntoIter<T, X> {}

impl<T, X> FusedIterator for IntoIter<T, X> {}
