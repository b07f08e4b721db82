use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use super::{compare, find};
use crate::collections::contiguous::SharedArray;

/// A borrowed view of a contiguous run of values, usually obtained from
/// [`SharedArray::slice`](SharedArray::slice).
///
/// Every method returns a new view into the same memory, so they can be chained freely.
///
/// # Examples
/// ```
/// # use shared_lib::collections::contiguous::SharedArray;
/// let arr = SharedArray::from_slice(&[0, 1, 2, 3, 4, 5]);
/// let view = arr.slice(1, 4);
/// assert_eq!(&*view, &[1, 2, 3, 4]);
/// assert_eq!(&*view.without_first_n(1).first_n(2), &[2, 3]);
/// ```
pub struct ArraySlice<'a, T> {
    values: &'a [T],
}

impl<'a, T> ArraySlice<'a, T> {
    pub const fn new(values: &'a [T]) -> ArraySlice<'a, T> {
        ArraySlice {
            values,
        }
    }

    /// Returns the viewed values with the full lifetime of the underlying storage.
    pub const fn as_slice(&self) -> &'a [T] {
        self.values
    }

    /// Returns a view of the first `n` values.
    pub fn first_n(&self, n: usize) -> ArraySlice<'a, T> {
        ArraySlice::new(&self.values[..n.min(self.values.len())])
    }

    /// Returns a view of everything except the first `n` values.
    pub fn without_first_n(&self, n: usize) -> ArraySlice<'a, T> {
        ArraySlice::new(&self.values[n.min(self.values.len())..])
    }

    /// Returns a view of the last `n` values.
    pub fn last_n(&self, n: usize) -> ArraySlice<'a, T> {
        let len = self.values.len();
        ArraySlice::new(&self.values[len - n.min(len)..])
    }

    /// Returns a view of everything except the last `n` values.
    pub fn without_last_n(&self, n: usize) -> ArraySlice<'a, T> {
        let len = self.values.len();
        ArraySlice::new(&self.values[..len - n.min(len)])
    }

    /// Returns a view of `len` values starting at `from`.
    pub fn substr(&self, from: usize, len: usize) -> ArraySlice<'a, T> {
        let from = from.min(self.values.len());
        let len = len.min(self.values.len() - from);
        ArraySlice::new(&self.values[from..from + len])
    }

    /// Removes leading values that match `pred`.
    pub fn trim_start_matches(&self, mut pred: impl FnMut(&T) -> bool) -> ArraySlice<'a, T> {
        let start = self.values.iter().position(|v| !pred(v)).unwrap_or(self.values.len());
        ArraySlice::new(&self.values[start..])
    }

    /// Removes trailing values that match `pred`.
    pub fn trim_end_matches(&self, mut pred: impl FnMut(&T) -> bool) -> ArraySlice<'a, T> {
        let end = self.values.iter().rposition(|v| !pred(v)).map_or(0, |i| i + 1);
        ArraySlice::new(&self.values[..end])
    }

    /// Removes leading and trailing values that match `pred`.
    pub fn trim_matches(&self, mut pred: impl FnMut(&T) -> bool) -> ArraySlice<'a, T> {
        self.trim_start_matches(&mut pred).trim_end_matches(pred)
    }
}

impl<'a, T: PartialEq> ArraySlice<'a, T> {
    /// Splits the view around the first occurrence of `delim`, returning the values before and
    /// after it. Returns [`None`] if `delim` doesn't occur.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::ArraySlice;
    /// let view = ArraySlice::new(&[1, 2, 0, 3, 0, 4]);
    /// let (before, after) = view.split_once(&0).unwrap();
    /// assert_eq!(&*before, &[1, 2]);
    /// assert_eq!(&*after, &[3, 0, 4]);
    /// assert!(view.split_once(&9).is_none());
    /// ```
    pub fn split_once(&self, delim: &T) -> Option<(ArraySlice<'a, T>, ArraySlice<'a, T>)> {
        let index = self.values.iter().position(|v| v == delim)?;
        Some((self.first_n(index), self.without_first_n(index + 1)))
    }

    /// Splits the view around the first occurrence of the sequence `delim`.
    pub fn split_once_seq(&self, delim: &[T]) -> Option<(ArraySlice<'a, T>, ArraySlice<'a, T>)> {
        let index = find(self.values, delim)?;
        Some((self.first_n(index), self.without_first_n(index + delim.len())))
    }

    /// Returns the index of the first occurrence of the sequence `needle`.
    pub fn find(&self, needle: &[T]) -> Option<usize> {
        find(self.values, needle)
    }
}

impl<T: Clone> ArraySlice<'_, T> {
    /// Copies the viewed values into a new [`SharedArray`].
    pub fn to_shared(&self) -> SharedArray<T> {
        SharedArray::from_slice(self.values)
    }
}

impl<T> Clone for ArraySlice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArraySlice<'_, T> {}

impl<T> Default for ArraySlice<'_, T> {
    fn default() -> Self {
        ArraySlice::new(&[])
    }
}

impl<T> Deref for ArraySlice<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.values
    }
}

impl<'a, T> From<&'a [T]> for ArraySlice<'a, T> {
    fn from(value: &'a [T]) -> Self {
        ArraySlice::new(value)
    }
}

impl<'a, T> From<&'a SharedArray<T>> for ArraySlice<'a, T> {
    fn from(value: &'a SharedArray<T>) -> Self {
        value.view()
    }
}

impl<'a, T> IntoIterator for ArraySlice<'a, T> {
    type Item = &'a T;

    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: PartialEq> PartialEq for ArraySlice<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<T: Eq> Eq for ArraySlice<'_, T> {}

impl<T: Ord> PartialOrd for ArraySlice<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for ArraySlice<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self.values, other.values)
    }
}

impl<T: Hash> Hash for ArraySlice<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state);
    }
}

impl<T: Debug> Debug for ArraySlice<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArraySlice").field(&self.values).finish()
    }
}
