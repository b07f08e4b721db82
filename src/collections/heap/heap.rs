use std::fmt::{self, Debug, Formatter};

use crate::collections::contiguous::SharedArray;
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// A max-heap backed by a [`SharedArray`].
///
/// Cloning a BinaryHeap shares its storage. The first modification of a shared heap copies it,
/// exactly like the array underneath. Sifting happens through [`SharedArray::lock`], so it swaps
/// values in place without touching the reference count.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the BinaryHeap.
///
/// | Method | Complexity |
/// |-|-|
/// | `clone` | `O(1)` |
/// | `peek` | `O(1)` |
/// | `push` | `O(log n)`*, `O(n)` |
/// | `pop` | `O(log n)`*, `O(n)` |
/// | `from` | `O(n)` |
/// | `into_sorted` | `O(n log n)` |
///
/// \* When the storage is unshared and has enough capacity.
///
/// # Examples
/// ```
/// # use shared_lib::collections::heap::BinaryHeap;
/// let mut heap = BinaryHeap::new();
/// heap.push(3);
/// heap.push(8);
/// heap.push(1);
/// assert_eq!(heap.peek(), Some(&8));
/// assert_eq!(heap.pop(), Some(8));
/// assert_eq!(heap.pop(), Some(3));
/// ```
pub struct BinaryHeap<T> {
    data: SharedArray<T>,
}

impl<T> BinaryHeap<T> {
    pub fn new() -> BinaryHeap<T> {
        BinaryHeap {
            data: SharedArray::new(),
        }
    }

    /// # Panics
    /// Panics if allocation fails.
    pub fn with_capacity(cap: usize) -> BinaryHeap<T> {
        BinaryHeap {
            data: SharedArray::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the largest value.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the values in heap order, which is unspecified apart from the first being the
    /// largest.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Returns the underlying array without sorting it.
    pub fn into_array(self) -> SharedArray<T> {
        self.data
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }
}

impl<T: Ord + Clone> BinaryHeap<T> {
    /// Adds `value` to the heap.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn push(&mut self, value: T) {
        self.try_push(value).throw()
    }

    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        self.data.try_push(value)?;
        // The push has left the buffer unshared, so locking it doesn't copy.
        let mut locked = self.data.try_lock()?;
        let last = locked.len() - 1;
        sift_up(&mut locked, last);
        Ok(())
    }

    /// Removes and returns the largest value.
    ///
    /// # Panics
    /// Panics if the heap is shared and copying it fails.
    pub fn pop(&mut self) -> Option<T> {
        self.try_pop().throw()
    }

    pub fn try_pop(&mut self) -> Result<Option<T>, AllocError> {
        if self.data.is_empty() {
            return Ok(None);
        }

        let mut locked = self.data.try_lock()?;
        let last = locked.len() - 1;
        locked.swap(0, last);
        let top = locked.pop();
        sift_down(&mut locked, 0);
        Ok(top)
    }

    /// Sorts the values in ascending order, reusing the heap's storage.
    ///
    /// # Panics
    /// Panics if the heap is shared and copying it fails.
    pub fn into_sorted(self) -> SharedArray<T> {
        let mut data = self.data;
        sort_heap(&mut data.lock());
        data
    }
}

impl<T> Clone for BinaryHeap<T> {
    /// Shares the storage with a new heap in `O(1)`.
    fn clone(&self) -> Self {
        BinaryHeap {
            data: self.data.clone(),
        }
    }
}

impl<T> Default for BinaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> From<SharedArray<T>> for BinaryHeap<T> {
    /// Rearranges the array into a heap in `O(n)`. The array is copied first if it is shared.
    ///
    /// # Panics
    /// Panics if the array is shared and copying it fails.
    fn from(mut value: SharedArray<T>) -> Self {
        heapify(&mut value.lock());
        BinaryHeap {
            data: value,
        }
    }
}

impl<T: Ord + Clone> FromIterator<T> for BinaryHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        BinaryHeap::from(iter.into_iter().collect::<SharedArray<T>>())
    }
}

impl<T: Ord + Clone> Extend<T> for BinaryHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.data.reserve(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Debug> Debug for BinaryHeap<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

/// Sorts `arr` in ascending order with a heap sort, in place and without extra allocation unless
/// the array is shared.
///
/// # Panics
/// Panics if the array is shared and copying it fails.
///
/// # Examples
/// ```
/// # use shared_lib::collections::contiguous::SharedArray;
/// # use shared_lib::collections::heap::heap_sort;
/// let mut arr = SharedArray::from([5, 2, 9, 1, 5, 6]);
/// heap_sort(&mut arr);
/// assert_eq!(arr, [1, 2, 5, 5, 6, 9]);
/// ```
pub fn heap_sort<T: Ord + Clone>(arr: &mut SharedArray<T>) {
    let mut locked = arr.lock();
    heapify(&mut locked);
    sort_heap(&mut locked);
}

fn heapify<T: Ord>(values: &mut [T]) {
    for index in (0..values.len() / 2).rev() {
        sift_down(values, index);
    }
}

/// Turns a max-heap into an ascending sequence by repeatedly moving the maximum to the end.
fn sort_heap<T: Ord>(values: &mut [T]) {
    for end in (1..values.len()).rev() {
        values.swap(0, end);
        sift_down(&mut values[..end], 0);
    }
}

fn sift_up<T: Ord>(values: &mut [T], mut index: usize) {
    while index > 0 {
        let parent = (index - 1) / 2;
        if values[index] <= values[parent] {
            break;
        }
        values.swap(index, parent);
        index = parent;
    }
}

fn sift_down<T: Ord>(values: &mut [T], mut index: usize) {
    let len = values.len();
    loop {
        let left = 2 * index + 1;
        if left >= len {
            break;
        }
        let right = left + 1;
        let child = if right < len && values[right] > values[left] {
            right
        } else {
            left
        };
        if values[child] <= values[index] {
            break;
        }
        values.swap(index, child);
        index = child;
    }
}
