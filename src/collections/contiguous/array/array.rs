use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Deref, DerefMut};

use crate::collections::contiguous::cow::CowVec;
use crate::collections::contiguous::view::{self, ArraySlice};
use crate::collections::contiguous::Locked;
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// A variable size contiguous collection with copy-on-write sharing.
///
/// Cloning a SharedArray is `O(1)`: both handles refer to the same reference-counted buffer until
/// one of them is modified, at which point the modified handle copies the values into a buffer of
/// its own. Reads never allocate. Anything that provides mutable access to the values (including
/// [`IndexMut`](std::ops::IndexMut) through [`DerefMut`]) copies a shared buffer first, which is why
/// most mutating methods require `T: Clone`.
///
/// Growth follows [`extra_capacity`](crate::collections::shared::extra_capacity), giving `O(1)`
/// amortized appends. An empty SharedArray never owns an allocation.
///
/// Every method that may allocate has a `try_` counterpart which returns an [`AllocError`] rather
/// than panicking. On failure, the array is left unchanged.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the SharedArray.
/// - `i`: The index of the item in question.
/// - `m`: The number of items being added.
///
/// | Method | Complexity |
/// |-|-|
/// | `clone` | `O(1)` |
/// | `get` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `append` | `O(m)`*, `O(n+m)` |
/// | `insert` | `O(n-i+m)`*, `O(n+m)` |
/// | `remove` | `O(n-i)`*, `O(n)` |
/// | `clear` | `O(n)`*, `O(1)` |
///
/// \* When the buffer is unshared and has enough capacity. Otherwise, the values are copied into a
/// new buffer.
pub struct SharedArray<T> {
    pub(crate) inner: CowVec<T, 0>,
}

impl<T> SharedArray<T> {
    /// Creates a new, empty SharedArray. This doesn't allocate.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let arr: SharedArray<u8> = SharedArray::new();
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.capacity(), 0);
    /// ```
    pub fn new() -> SharedArray<T> {
        SharedArray {
            inner: CowVec::new(),
        }
    }

    /// Creates a new SharedArray with capacity for exactly `cap` values.
    ///
    /// # Panics
    /// Panics if allocation fails.
    #[doc(alias = "with_capacity_exact")]
    pub fn with_capacity(cap: usize) -> SharedArray<T> {
        Self::try_with_capacity(cap).throw()
    }

    pub fn try_with_capacity(cap: usize) -> Result<SharedArray<T>, AllocError> {
        Ok(SharedArray {
            inner: CowVec::try_with_capacity(cap)?,
        })
    }

    /// Returns the number of values in the SharedArray.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the SharedArray contains no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of values that the current buffer can hold.
    pub fn capacity(&self) -> usize {
        self.inner.cap()
    }

    /// Returns true if another handle refers to the same buffer. Empty arrays without an allocation
    /// are always considered shared.
    pub fn is_shared(&self) -> bool {
        self.inner.buf.is_shared()
    }

    /// Returns a pointer to the first value. Handles sharing a buffer return the same pointer.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let a = SharedArray::from_slice(&[1, 2, 3]);
    /// let mut b = a.clone();
    /// assert_eq!(a.as_ptr(), b.as_ptr());
    /// b.push(4);
    /// assert_ne!(a.as_ptr(), b.as_ptr());
    /// assert_eq!(&*a, &[1, 2, 3]);
    /// ```
    pub fn as_ptr(&self) -> *const T {
        self.inner.buf.as_ptr().cast_const()
    }

    /// Returns the values as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Returns a view of `len` values starting at `from`. Both are clamped to the length.
    ///
    /// The view borrows this handle, so it can't outlive the buffer it refers to.
    pub fn slice(&self, from: usize, len: usize) -> ArraySlice<'_, T> {
        self.view().substr(from, len)
    }

    /// Returns a view of all values.
    #[doc(alias = "as_slice_view")]
    pub fn view(&self) -> ArraySlice<'_, T> {
        ArraySlice::new(self.as_slice())
    }

    /// Removes all values, leaving the array empty. An unshared array keeps its capacity, while a
    /// shared one just releases its reference.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let mut arr = SharedArray::from_slice(&[1, 2, 3]);
    /// arr.clear();
    /// arr.clear();
    /// assert!(arr.is_empty());
    /// ```
    #[doc(alias = "empty")]
    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Returns true if both handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &SharedArray<T>) -> bool {
        self.inner.buf.ptr_eq(&other.inner.buf)
    }
}

impl<T: Clone> SharedArray<T> {
    /// Creates a SharedArray containing clones of the values in `source`.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn from_slice(source: &[T]) -> SharedArray<T> {
        Self::try_from_slice(source).throw()
    }

    pub fn try_from_slice(source: &[T]) -> Result<SharedArray<T>, AllocError> {
        let mut arr = SharedArray::new();
        arr.try_assign(source)?;
        Ok(arr)
    }

    /// Creates a SharedArray containing `count` clones of `value`, with exactly enough capacity.
    ///
    /// # Panics
    /// Panics if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let arr = SharedArray::repeat(&7, 3);
    /// assert_eq!(&*arr, &[7, 7, 7]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn repeat(value: &T, count: usize) -> SharedArray<T> {
        Self::try_repeat(value, count).throw()
    }

    pub fn try_repeat(value: &T, count: usize) -> Result<SharedArray<T>, AllocError> {
        let mut arr = SharedArray::try_with_capacity(count)?;
        for _ in 0..count {
            // SAFETY: The buffer was just allocated with capacity for count values.
            unsafe { arr.inner.buf.push_unchecked(value.clone()) };
        }
        Ok(arr)
    }

    /// Returns a mutable reference to the value at `index`, copying a shared buffer first.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.make_mut().get_mut(index)
    }

    /// Returns the values as a mutable slice, copying a shared buffer first.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn make_mut(&mut self) -> &mut [T] {
        self.try_make_mut().throw()
    }

    pub fn try_make_mut(&mut self) -> Result<&mut [T], AllocError> {
        self.inner.try_make_mut()
    }

    /// Replaces the contents of the array with clones of `source`.
    ///
    /// If the array is unshared and large enough, the existing values are overwritten in place.
    /// Otherwise a new buffer is allocated.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn assign(&mut self, source: &[T]) {
        self.try_assign(source).throw()
    }

    pub fn try_assign(&mut self, source: &[T]) -> Result<(), AllocError> {
        self.inner.try_assign(source)
    }

    /// Overwrites the values starting at `index` with clones of `source`, extending the array if
    /// `source` runs past the end.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let mut arr = SharedArray::from_slice(&[1, 2, 3]);
    /// arr.overwrite(2, &[30, 40]);
    /// assert_eq!(&*arr, &[1, 2, 30, 40]);
    /// ```
    #[doc(alias = "set_at")]
    pub fn overwrite(&mut self, index: usize, source: &[T]) {
        self.try_overwrite(index, source).throw()
    }

    pub fn try_overwrite(&mut self, index: usize, source: &[T]) -> Result<(), AllocError> {
        self.inner.try_overwrite(index, source)
    }

    /// Inserts clones of `source` at `index`, shifting all following values right.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let mut arr = SharedArray::from_slice(&[1, 2, 3]);
    /// arr.insert(1, &[42]);
    /// assert_eq!(&*arr, &[1, 42, 2, 3]);
    /// ```
    pub fn insert(&mut self, index: usize, source: &[T]) {
        self.try_insert(index, source).throw()
    }

    pub fn try_insert(&mut self, index: usize, source: &[T]) -> Result<(), AllocError> {
        self.inner.try_insert(index, source)
    }

    /// Inserts a single value at `index`, shifting all following values right.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    pub fn insert_one(&mut self, index: usize, value: T) {
        self.try_insert_one(index, value).throw()
    }

    pub fn try_insert_one(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        self.inner.try_insert_one(index, value)
    }

    /// Appends clones of all values in `source`.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn append(&mut self, source: &[T]) {
        self.try_append(source).throw()
    }

    pub fn try_append(&mut self, source: &[T]) -> Result<(), AllocError> {
        self.inner.try_append(source)
    }

    /// Pushes `value` onto the end of the array.
    ///
    /// # Panics
    /// Panics if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let mut arr = SharedArray::new();
    /// for i in 1..=3 {
    ///     arr.push(i);
    /// }
    /// assert_eq!(&*arr, &[1, 2, 3]);
    /// assert_eq!(arr.capacity(), 5);
    /// ```
    pub fn push(&mut self, value: T) {
        self.try_push(value).throw()
    }

    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        self.inner.try_push(value)
    }

    /// Removes the last value. If the buffer is shared, a clone of the value is returned and the
    /// array copies the remaining values into a buffer of its own.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn pop(&mut self) -> Option<T> {
        self.try_pop().throw()
    }

    pub fn try_pop(&mut self) -> Result<Option<T>, AllocError> {
        self.inner.try_pop()
    }

    /// Removes `count` values starting at `index`. A count which runs past the end is clamped
    /// rather than treated as an error.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let mut arr = SharedArray::from_slice(&[1, 2, 3, 4, 5]);
    /// arr.remove(1, 2);
    /// assert_eq!(&*arr, &[1, 4, 5]);
    /// arr.remove(1, 100);
    /// assert_eq!(&*arr, &[1]);
    /// ```
    pub fn remove(&mut self, index: usize, count: usize) {
        self.try_remove(index, count).throw()
    }

    pub fn try_remove(&mut self, index: usize, count: usize) -> Result<(), AllocError> {
        self.inner.try_remove(index, count)
    }

    /// Shortens the array to `len` values. Has no effect if the array is already shorter.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn truncate(&mut self, len: usize) {
        self.try_truncate(len).throw()
    }

    pub fn try_truncate(&mut self, len: usize) -> Result<(), AllocError> {
        self.inner.try_truncate(len)
    }

    /// Ensures that the array is unshared with room for at least `extra` more values. When a new
    /// buffer is needed, it is sized with the grow policy.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn reserve(&mut self, extra: usize) {
        self.try_reserve(extra).throw()
    }

    pub fn try_reserve(&mut self, extra: usize) -> Result<(), AllocError> {
        let total = self.len().checked_add(extra).ok_or(AllocError::CapacityOverflow)?;
        self.inner.try_reserve(total)
    }

    /// Ensures that the array is unshared with room for at least `extra` more values. When a new
    /// buffer is needed, it has exactly enough capacity.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn reserve_exact(&mut self, extra: usize) {
        self.try_reserve_exact(extra).throw()
    }

    pub fn try_reserve_exact(&mut self, extra: usize) -> Result<(), AllocError> {
        let total = self.len().checked_add(extra).ok_or(AllocError::CapacityOverflow)?;
        self.inner.try_reserve_exact(total)
    }

    /// Reallocates so that the capacity is equal to the length. An empty array releases its buffer.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn shrink_to_fit(&mut self) {
        self.try_shrink_to_fit().throw()
    }

    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        self.inner.try_shrink_to_fit()
    }

    /// Locks the buffer, providing exclusive access to the values and the spare capacity without
    /// any per-value bookkeeping. See [`Locked`].
    ///
    /// # Panics
    /// Panics if the buffer is shared and copying it fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedArray;
    /// let mut arr = SharedArray::from_slice(&[3, 1, 2]);
    /// arr.reserve(1);
    /// {
    ///     let mut locked = arr.lock();
    ///     locked.sort();
    ///     locked.push(4).unwrap();
    /// }
    /// assert_eq!(&*arr, &[1, 2, 3, 4]);
    /// ```
    pub fn lock(&mut self) -> Locked<'_, T> {
        self.try_lock().throw()
    }

    pub fn try_lock(&mut self) -> Result<Locked<'_, T>, AllocError> {
        self.inner.try_isolate()?;
        Ok(Locked::acquire(&mut self.inner.buf))
    }
}

impl<T> Clone for SharedArray<T> {
    /// Shares the buffer with a new handle in `O(1)`.
    fn clone(&self) -> Self {
        SharedArray {
            inner: CowVec {
                buf: self.inner.buf.clone(),
            },
        }
    }
}

impl<T> Default for SharedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for SharedArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Clone> DerefMut for SharedArray<T> {
    /// Copies a shared buffer before handing out mutable access.
    ///
    /// # Panics
    /// Panics if allocation fails.
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.make_mut()
    }
}

impl<T> AsRef<[T]> for SharedArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> Borrow<[T]> for SharedArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone> From<&[T]> for SharedArray<T> {
    fn from(value: &[T]) -> Self {
        SharedArray::from_slice(value)
    }
}

impl<T, const N: usize> From<[T; N]> for SharedArray<T> {
    fn from(value: [T; N]) -> Self {
        let mut arr = SharedArray::with_capacity(N);
        for item in value {
            // SAFETY: The buffer was allocated with capacity for all N values.
            unsafe { arr.inner.buf.push_unchecked(item) };
        }
        arr
    }
}

impl<T: Clone> FromIterator<T> for SharedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = SharedArray::new();
        arr.extend(iter);
        arr
    }
}

impl<T: Clone> Extend<T> for SharedArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Clone + 'a> Extend<&'a T> for SharedArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T: Clone> Add<&[T]> for &SharedArray<T> {
    type Output = SharedArray<T>;

    /// Concatenates into a new array, which always allocates.
    fn add(self, rhs: &[T]) -> Self::Output {
        let mut arr = SharedArray::new();
        arr.reserve(self.len() + rhs.len());
        arr.append(self);
        arr.append(rhs);
        arr
    }
}

impl<T: Clone> Add<&SharedArray<T>> for &SharedArray<T> {
    type Output = SharedArray<T>;

    fn add(self, rhs: &SharedArray<T>) -> Self::Output {
        self + rhs.as_slice()
    }
}

impl<T: Clone> AddAssign<&[T]> for SharedArray<T> {
    fn add_assign(&mut self, rhs: &[T]) {
        self.append(rhs);
    }
}

impl<T: Clone> AddAssign<&SharedArray<T>> for SharedArray<T> {
    fn add_assign(&mut self, rhs: &SharedArray<T>) {
        // An empty array can just share the other buffer.
        if self.is_empty() {
            *self = rhs.clone();
        } else {
            self.append(rhs);
        }
    }
}

impl<T: PartialEq> PartialEq for SharedArray<T> {
    /// Compares value by value, even for handles sharing a buffer, so values which aren't equal to
    /// themselves (like `f64::NAN`) keep their slice semantics.
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for SharedArray<T> {}

impl<T: PartialEq> PartialEq<[T]> for SharedArray<T> {
    fn eq(&self, other: &[T]) -> bool {
        **self == *other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for SharedArray<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        **self == *other
    }
}

impl<T: Ord> PartialOrd for SharedArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for SharedArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        view::compare(self, other)
    }
}

impl<T: Hash> Hash for SharedArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug> Debug for SharedArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedArray")
            .field("contents", &self.as_slice())
            .field("len", &self.len())
            .field("cap", &self.capacity())
            .field("refs", &self.inner.buf.refs())
            .finish()
    }
}

impl<T: Debug> Display for SharedArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
