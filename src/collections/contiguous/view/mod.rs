//! Non-owning views over contiguous storage: [`ArraySlice`] and [`StringView`].
//!
//! A view is nothing more than a borrowed slice. Every operation here computes a new view from an
//! existing one without allocating or touching a reference count. Because views borrow the handle
//! they were created from, the compiler guarantees that a view never outlives its buffer.
//!
//! Counts which run past the end of a view are clamped rather than treated as errors.

mod array_slice;
mod split;
mod string_view;

use std::cmp::Ordering;

pub use array_slice::*;
pub use split::*;
pub use string_view::*;

/// Compares two slices lexicographically, taking the lengths into account: only the overlapping
/// prefix is compared value by value, and if that prefix is equal the shorter slice is less.
pub(crate) fn compare<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    let common = a.len().min(b.len());
    match a[..common].cmp(&b[..common]) {
        Ordering::Equal => a.len().cmp(&b.len()),
        ordering => ordering,
    }
}

/// Returns the index of the first occurrence of `needle` in `haystack`. An empty needle is found at
/// index 0.
pub(crate) fn find<T: PartialEq>(haystack: &[T], needle: &[T]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Returns the index of the last occurrence of `needle` in `haystack`. An empty needle is found at
/// the end.
pub(crate) fn rfind<T: PartialEq>(haystack: &[T], needle: &[T]) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).rposition(|window| window == needle)
}
