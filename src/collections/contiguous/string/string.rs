use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ffi::{CStr, FromBytesWithNulError};
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Deref, DerefMut};
use std::slice;
use std::str::{self, Utf8Error};

use super::StringLock;
use crate::collections::contiguous::Locked;
use crate::collections::contiguous::cow::CowVec;
use crate::collections::contiguous::view::{self, Split, StringView};
use crate::collections::shared::Buffer;
use crate::util::error::AllocError;
use crate::util::result::ResultExtension;

/// A byte string with copy-on-write sharing, built on the same buffers as
/// [`SharedArray`](crate::collections::contiguous::SharedArray).
///
/// Every buffer reserves one byte past its capacity, and the byte at [`len`](SharedString::len) is
/// always 0 once a public method returns. This means that [`as_ptr`](SharedString::as_ptr) can be
/// handed to anything expecting a C string at any time, except while the string is
/// [locked](SharedString::lock).
///
/// The contents are treated as bytes. UTF-8 is only checked by [`as_str`](SharedString::as_str),
/// and formatting with [`Display`] is lossy.
///
/// # Examples
/// ```
/// # use shared_lib::collections::contiguous::SharedString;
/// let mut s = SharedString::from("abc");
/// s.insert(1, "X");
/// assert_eq!(s, "aXbc");
/// assert_eq!(s.as_bytes_with_nul(), b"aXbc\0");
/// ```
pub struct SharedString {
    pub(crate) inner: CowVec<u8, 1>,
}

impl SharedString {
    /// Creates a new, empty SharedString. This doesn't allocate.
    pub fn new() -> SharedString {
        SharedString {
            inner: CowVec::new(),
        }
    }

    /// Creates a new SharedString with capacity for exactly `cap` bytes, plus the terminator.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn with_capacity(cap: usize) -> SharedString {
        Self::try_with_capacity(cap).throw()
    }

    pub fn try_with_capacity(cap: usize) -> Result<SharedString, AllocError> {
        let mut string = SharedString {
            inner: CowVec::try_with_capacity(cap)?,
        };
        string.terminate();
        Ok(string)
    }

    /// Creates a SharedString containing a copy of `bytes`.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn from_bytes(bytes: &[u8]) -> SharedString {
        Self::try_from_bytes(bytes).throw()
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<SharedString, AllocError> {
        let mut string = SharedString::new();
        string.try_assign(bytes)?;
        Ok(string)
    }

    /// Creates a SharedString of `count` copies of `byte`, with exactly enough capacity.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn from_byte(byte: u8, count: usize) -> SharedString {
        Self::repeat([byte], count)
    }

    /// Creates a SharedString containing `times` back-to-back copies of `seq`. The result is built
    /// in a single allocation of exactly the right size.
    ///
    /// # Panics
    /// Panics if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedString;
    /// let s = SharedString::repeat("ab", 3);
    /// assert_eq!(s, "ababab");
    /// assert_eq!(s.capacity(), 6);
    /// ```
    pub fn repeat(seq: impl AsRef<[u8]>, times: usize) -> SharedString {
        Self::try_repeat(seq, times).throw()
    }

    pub fn try_repeat(seq: impl AsRef<[u8]>, times: usize) -> Result<SharedString, AllocError> {
        let seq = seq.as_ref();
        let total = seq.len().checked_mul(times).ok_or(AllocError::CapacityOverflow)?;
        let mut buf = Buffer::<u8, 1>::try_allocate(total)?;
        if total != 0 {
            // SAFETY: buf is unshared with capacity for exactly `times` copies of seq.
            unsafe {
                let mut dst = buf.as_ptr();
                for _ in 0..times {
                    dst.copy_from_nonoverlapping(seq.as_ptr(), seq.len());
                    dst = dst.add(seq.len());
                }
                buf.set_len(total);
            }
        }

        let mut string = SharedString {
            inner: CowVec {
                buf,
            },
        };
        string.terminate();
        Ok(string)
    }

    /// Creates a SharedString from formatting arguments, as produced by [`format_args!`].
    ///
    /// # Panics
    /// Panics if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedString;
    /// let s = SharedString::format(format_args!("{}-{:03}", "id", 7));
    /// assert_eq!(s, "id-007");
    /// ```
    pub fn format(args: fmt::Arguments<'_>) -> SharedString {
        let mut string = SharedString::new();
        string.append_fmt(args);
        string
    }

    /// Appends the formatted arguments to the end of the string.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) {
        if self.write_fmt(args).is_err() {
            panic!("Formatting into a SharedString failed!");
        }
    }

    /// Returns the number of bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes the current buffer can hold, excluding the terminator.
    pub fn capacity(&self) -> usize {
        self.inner.cap()
    }

    /// Returns true if another handle refers to the same buffer. Empty strings without an
    /// allocation are always considered shared.
    pub fn is_shared(&self) -> bool {
        self.inner.buf.is_shared()
    }

    /// Returns true if both handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &SharedString) -> bool {
        self.inner.buf.ptr_eq(&other.inner.buf)
    }

    /// Returns a pointer to the first byte. The pointer is valid for `len() + 1` reads, the last of
    /// which is the terminating 0.
    pub fn as_ptr(&self) -> *const u8 {
        self.inner.buf.as_ptr().cast_const()
    }

    /// Returns the bytes, excluding the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_slice()
    }

    /// Returns the bytes, including the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        // SAFETY: Every buffer holds len + 1 initialized bytes: the contents and the terminator.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len() + 1) }
    }

    /// Returns the string as a [`CStr`].
    ///
    /// # Errors
    /// Returns an error if the contents contain a 0 byte.
    pub fn as_c_str(&self) -> Result<&CStr, FromBytesWithNulError> {
        CStr::from_bytes_with_nul(self.as_bytes_with_nul())
    }

    /// Interprets the bytes as UTF-8.
    ///
    /// # Errors
    /// Returns a [`Utf8Error`] if the bytes aren't valid UTF-8.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }

    /// Returns a view of all bytes.
    pub fn view(&self) -> StringView<'_> {
        StringView::new(self.as_bytes())
    }

    /// Returns a view of `len` bytes starting at `from`. Both are clamped to the length.
    pub fn slice(&self, from: usize, len: usize) -> StringView<'_> {
        self.view().substr(from, len)
    }

    /// Returns the bytes as a mutable slice, copying a shared buffer first. The length can't be
    /// changed through the slice, so the terminator is unaffected.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn make_mut(&mut self) -> &mut [u8] {
        self.try_make_mut().throw()
    }

    pub fn try_make_mut(&mut self) -> Result<&mut [u8], AllocError> {
        self.inner.try_isolate()?;
        self.terminate();
        self.inner.try_make_mut()
    }

    /// Replaces the contents with a copy of `bytes`.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn assign(&mut self, bytes: impl AsRef<[u8]>) {
        self.try_assign(bytes).throw()
    }

    pub fn try_assign(&mut self, bytes: impl AsRef<[u8]>) -> Result<(), AllocError> {
        let result = self.inner.try_assign(bytes.as_ref());
        self.terminate();
        result
    }

    /// Overwrites the bytes starting at `index`, extending the string if required.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    #[doc(alias = "set_at")]
    pub fn overwrite(&mut self, index: usize, bytes: impl AsRef<[u8]>) {
        self.try_overwrite(index, bytes).throw()
    }

    pub fn try_overwrite(&mut self, index: usize, bytes: impl AsRef<[u8]>) -> Result<(), AllocError> {
        let result = self.inner.try_overwrite(index, bytes.as_ref());
        self.terminate();
        result
    }

    /// Inserts `bytes` at `index`.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    pub fn insert(&mut self, index: usize, bytes: impl AsRef<[u8]>) {
        self.try_insert(index, bytes).throw()
    }

    pub fn try_insert(&mut self, index: usize, bytes: impl AsRef<[u8]>) -> Result<(), AllocError> {
        let result = self.inner.try_insert(index, bytes.as_ref());
        self.terminate();
        result
    }

    /// Appends `bytes` to the end of the string.
    ///
    /// # Panics
    /// Panics if allocation fails.
    #[doc(alias = "push_str")]
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) {
        self.try_append(bytes).throw()
    }

    pub fn try_append(&mut self, bytes: impl AsRef<[u8]>) -> Result<(), AllocError> {
        let result = self.inner.try_append(bytes.as_ref());
        self.terminate();
        result
    }

    /// Appends a single byte.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn push(&mut self, byte: u8) {
        self.try_push(byte).throw()
    }

    pub fn try_push(&mut self, byte: u8) -> Result<(), AllocError> {
        let result = self.inner.try_push(byte);
        self.terminate();
        result
    }

    /// Removes and returns the last byte.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn pop(&mut self) -> Option<u8> {
        let result = self.inner.try_pop().throw();
        self.terminate();
        result
    }

    /// Removes `count` bytes starting at `index`. A count which runs past the end is clamped.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocation fails.
    pub fn remove(&mut self, index: usize, count: usize) {
        self.try_remove(index, count).throw()
    }

    pub fn try_remove(&mut self, index: usize, count: usize) -> Result<(), AllocError> {
        let result = self.inner.try_remove(index, count);
        self.terminate();
        result
    }

    /// Shortens the string to `len` bytes. Has no effect if the string is already shorter.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn truncate(&mut self, len: usize) {
        let result = self.inner.try_truncate(len);
        self.terminate();
        result.throw()
    }

    /// Removes all bytes. See [`SharedArray::clear`](crate::collections::contiguous::SharedArray::clear).
    #[doc(alias = "empty")]
    pub fn clear(&mut self) {
        self.inner.clear();
        self.terminate();
    }

    /// Ensures that the string is unshared with room for at least `extra` more bytes, growing with
    /// the grow policy.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn reserve(&mut self, extra: usize) {
        self.try_reserve(extra).throw()
    }

    pub fn try_reserve(&mut self, extra: usize) -> Result<(), AllocError> {
        let total = self.len().checked_add(extra).ok_or(AllocError::CapacityOverflow)?;
        let result = self.inner.try_reserve(total);
        self.terminate();
        result
    }

    /// Ensures that the string is unshared with room for at least `extra` more bytes. A new buffer
    /// has exactly enough capacity.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn reserve_exact(&mut self, extra: usize) {
        self.try_reserve_exact(extra).throw()
    }

    pub fn try_reserve_exact(&mut self, extra: usize) -> Result<(), AllocError> {
        let total = self.len().checked_add(extra).ok_or(AllocError::CapacityOverflow)?;
        let result = self.inner.try_reserve_exact(total);
        self.terminate();
        result
    }

    /// Reallocates so that the capacity is equal to the length.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn shrink_to_fit(&mut self) {
        let result = self.inner.try_shrink_to_fit();
        self.terminate();
        result.throw()
    }

    /// Locks the buffer. The terminator isn't maintained while locked, and is rewritten at the
    /// committed length when the lock is dropped. See [`Locked`].
    ///
    /// # Panics
    /// Panics if the buffer is shared and copying it fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedString;
    /// let mut s = SharedString::with_capacity(8);
    /// {
    ///     let mut locked = s.lock();
    ///     for byte in b"locked" {
    ///         locked.push(*byte).unwrap();
    ///     }
    /// }
    /// assert_eq!(s.as_bytes_with_nul(), b"locked\0");
    /// ```
    pub fn lock(&mut self) -> StringLock<'_> {
        self.try_lock().throw()
    }

    pub fn try_lock(&mut self) -> Result<StringLock<'_>, AllocError> {
        self.inner.try_isolate()?;
        Ok(StringLock::new(Locked::acquire(&mut self.inner.buf)))
    }

    /// Returns the index of the first occurrence of `needle`.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedString;
    /// let s = SharedString::from("abcabc");
    /// assert_eq!(s.find("bc"), Some(1));
    /// assert_eq!(s.rfind("bc"), Some(4));
    /// assert_eq!(s.find("x"), None);
    /// ```
    pub fn find(&self, needle: impl AsRef<[u8]>) -> Option<usize> {
        self.view().find(needle)
    }

    /// Returns the index of the last occurrence of `needle`.
    pub fn rfind(&self, needle: impl AsRef<[u8]>) -> Option<usize> {
        self.view().rfind(needle)
    }

    /// Returns the index of the first occurrence of `byte`.
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        self.view().find_byte(byte)
    }

    pub fn contains(&self, needle: impl AsRef<[u8]>) -> bool {
        self.view().contains(needle)
    }

    pub fn starts_with(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.view().starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: impl AsRef<[u8]>) -> bool {
        self.view().ends_with(suffix)
    }

    /// Splits the string around the first occurrence of `delim`. The parts are views into this
    /// string, not copies.
    pub fn split_once(&self, delim: impl AsRef<[u8]>) -> Option<(StringView<'_>, StringView<'_>)> {
        self.view().split_once(delim)
    }

    /// Returns an iterator over views of the parts separated by `delim`.
    pub fn split<'a>(&'a self, delim: &'a [u8]) -> Split<'a> {
        self.view().split(delim)
    }

    /// Removes leading ASCII whitespace in place.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn trim_start(&mut self) {
        let leading = self.len() - self.view().trim_start().len();
        if leading != 0 {
            self.remove(0, leading);
        }
    }

    /// Removes trailing ASCII whitespace in place.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn trim_end(&mut self) {
        let len = self.view().trim_end().len();
        self.truncate(len);
    }

    /// Removes leading and trailing ASCII whitespace in place.
    ///
    /// # Panics
    /// Panics if allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::SharedString;
    /// let mut s = SharedString::from("\t padded \n");
    /// s.trim();
    /// assert_eq!(s, "padded");
    /// ```
    pub fn trim(&mut self) {
        self.trim_end();
        self.trim_start();
    }

    /// Converts every ASCII letter to lower case in place.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn make_ascii_lowercase(&mut self) {
        if self.bytes().any(|b| b.is_ascii_uppercase()) {
            self.make_mut().make_ascii_lowercase();
        }
    }

    /// Converts every ASCII letter to upper case in place.
    ///
    /// # Panics
    /// Panics if allocation fails.
    pub fn make_ascii_uppercase(&mut self) {
        if self.bytes().any(|b| b.is_ascii_lowercase()) {
            self.make_mut().make_ascii_uppercase();
        }
    }

    /// Returns a copy with every ASCII letter converted to lower case. Shares the buffer if there
    /// is nothing to convert.
    pub fn to_ascii_lowercase(&self) -> SharedString {
        let mut string = self.clone();
        string.make_ascii_lowercase();
        string
    }

    /// Returns a copy with every ASCII letter converted to upper case. Shares the buffer if there
    /// is nothing to convert.
    pub fn to_ascii_uppercase(&self) -> SharedString {
        let mut string = self.clone();
        string.make_ascii_uppercase();
        string
    }

    fn bytes(&self) -> impl Iterator<Item = &u8> {
        self.as_bytes().iter()
    }

    /// Writes the terminator after the last byte. Shared buffers (including the sentinel) already
    /// have one, because they can't have been modified since they were last terminated.
    fn terminate(&mut self) {
        let buf = &mut self.inner.buf;
        if !buf.is_shared() {
            // SAFETY: Every string buffer has a slack byte after its capacity, so the slot at len
            // is always within the allocation, and the buffer is exclusively ours.
            unsafe { buf.as_ptr().add(buf.len()).write(0) }
        }
    }
}

impl Clone for SharedString {
    /// Shares the buffer with a new handle in `O(1)`.
    fn clone(&self) -> Self {
        SharedString {
            inner: CowVec {
                buf: self.inner.buf.clone(),
            },
        }
    }
}

impl Default for SharedString {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedString {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl DerefMut for SharedString {
    /// Copies a shared buffer before handing out mutable access.
    ///
    /// # Panics
    /// Panics if allocation fails.
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.make_mut()
    }
}

impl AsRef<[u8]> for SharedString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Borrow<[u8]> for SharedString {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<&str> for SharedString {
    fn from(value: &str) -> Self {
        SharedString::from_bytes(value.as_bytes())
    }
}

impl From<&[u8]> for SharedString {
    fn from(value: &[u8]) -> Self {
        SharedString::from_bytes(value)
    }
}

impl From<StringView<'_>> for SharedString {
    fn from(value: StringView<'_>) -> Self {
        value.to_shared()
    }
}

impl Write for SharedString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_append(s).map_err(|_| fmt::Error)
    }
}

impl Extend<u8> for SharedString {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for byte in iter {
            self.push(byte);
        }
    }
}

impl FromIterator<u8> for SharedString {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut string = SharedString::new();
        string.extend(iter);
        string
    }
}

impl<R: AsRef<[u8]>> Add<R> for &SharedString {
    type Output = SharedString;

    /// Concatenates into a new string, which always allocates.
    fn add(self, rhs: R) -> Self::Output {
        let rhs = rhs.as_ref();
        let mut string = SharedString::new();
        string.reserve(self.len() + rhs.len());
        string.append(self);
        string.append(rhs);
        string
    }
}

impl<R: AsRef<[u8]>> AddAssign<R> for SharedString {
    fn add_assign(&mut self, rhs: R) {
        self.append(rhs);
    }
}

impl PartialEq for SharedString {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_bytes() == other.as_bytes()
    }
}

impl Eq for SharedString {}

impl PartialEq<str> for SharedString {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for SharedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<[u8]> for SharedString {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<StringView<'_>> for SharedString {
    fn eq(&self, other: &StringView<'_>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd for SharedString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SharedString {
    fn cmp(&self, other: &Self) -> Ordering {
        view::compare(self.as_bytes(), other.as_bytes())
    }
}

impl Hash for SharedString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Debug for SharedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        view::write_escaped(self.as_bytes(), f)
    }
}

impl Display for SharedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.view(), f)
    }
}
