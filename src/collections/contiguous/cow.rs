use std::ptr;

use crate::collections::shared::{Buffer, extra_capacity};
use crate::util::error::{AllocError, IndexOutOfBounds};
use crate::util::result::ResultExtension;

/// The copy-on-write engine behind [`SharedArray`](super::SharedArray) and
/// [`SharedString`](super::SharedString).
///
/// Every mutation follows the same rule: when the buffer is unshared and already large enough, the
/// values are modified in place. Otherwise a new buffer is sized with [`extra_capacity`], filled
/// with the head, the new values and the tail (in that order), and only then swapped in with
/// [`replace_buffer`](CowVec::replace_buffer). Because the old buffer isn't touched until that
/// final swap, a failed allocation or a panicking [`Clone`] leaves the handle exactly as it was.
pub(crate) struct CowVec<T, const SLACK: usize> {
    pub buf: Buffer<T, SLACK>,
}

impl<T, const SLACK: usize> CowVec<T, SLACK> {
    pub fn new() -> CowVec<T, SLACK> {
        CowVec {
            buf: Buffer::empty(),
        }
    }

    pub fn try_with_capacity(cap: usize) -> Result<CowVec<T, SLACK>, AllocError> {
        Ok(CowVec {
            buf: Buffer::try_allocate(cap)?,
        })
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn cap(&self) -> usize {
        self.buf.cap()
    }

    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Rebinds this handle to `buf`, releasing the buffer that it previously referred to. This is
    /// the only place where a handle changes allocations.
    pub fn replace_buffer(&mut self, buf: Buffer<T, SLACK>) {
        debug_assert!(!self.buf.is_locked(), "Cannot replace a locked buffer!");
        self.buf = buf;
    }

    /// Removes every value. An unshared buffer drops its values and keeps its capacity, a shared
    /// buffer is simply released in favour of the sentinel.
    pub fn clear(&mut self) {
        if self.buf.is_shared() {
            if !self.buf.is_sentinel() {
                self.replace_buffer(Buffer::empty());
            }
            return;
        }

        let len = self.len();
        // SAFETY: The buffer is unshared. The length is zeroed before dropping, so a panicking drop
        // leaks the remaining values instead of dropping them twice.
        unsafe {
            self.buf.set_len(0);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.as_ptr(), len));
        }
    }

    /// Checks that `index` is a valid insertion point, that is, `index <= len`.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length.
    #[track_caller]
    pub fn check_position(&self, index: usize) {
        if index > self.len() {
            Err(IndexOutOfBounds {
                index,
                len: self.len(),
            }).throw()
        }
    }
}

impl<T: Clone, const SLACK: usize> CowVec<T, SLACK> {
    /// Moves (or clones, if shared) the first `min(len, new_cap)` values into a new buffer with
    /// capacity `new_cap`, which then replaces the current one.
    pub fn try_reallocate(&mut self, new_cap: usize) -> Result<(), AllocError> {
        let len = self.len();
        let keep = len.min(new_cap);
        let mut fresh = Buffer::try_allocate(new_cap)?;

        if self.buf.is_shared() {
            tracing::trace!(len, new_cap, "copying shared buffer before write");
            // SAFETY: fresh is unshared with capacity for keep values.
            unsafe { fresh.extend_cloned(&self.as_slice()[..keep]) };
        } else {
            // SAFETY: Both buffers are unshared and distinct. The first keep values are moved
            // bitwise and the old length is zeroed before the dropped tail is destroyed, so no
            // value is dropped twice. The old buffer is released by replace_buffer afterwards, by
            // which point it holds no initialized values.
            unsafe {
                let old = self.buf.as_ptr();
                ptr::copy_nonoverlapping(old, fresh.as_ptr(), keep);
                fresh.set_len(keep);
                self.buf.set_len(0);
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(old.add(keep), len - keep));
            }
        }

        self.replace_buffer(fresh);
        Ok(())
    }

    /// Makes sure that this handle is the only one referring to its buffer, copying the values into
    /// a private buffer of the same capacity if required.
    pub fn try_isolate(&mut self) -> Result<(), AllocError> {
        if self.buf.is_shared() && !self.buf.is_sentinel() {
            self.try_reallocate(self.cap())?;
        }
        Ok(())
    }

    /// Ensures that the buffer is unshared with room for at least `total` values, growing with
    /// [`extra_capacity`] if it isn't large enough.
    pub fn try_reserve(&mut self, total: usize) -> Result<(), AllocError> {
        if total <= self.cap() {
            self.try_isolate()
        } else {
            self.try_reallocate(extra_capacity(total))
        }
    }

    /// The same as [`try_reserve`](CowVec::try_reserve), except that a new buffer is given exactly
    /// `total` capacity.
    pub fn try_reserve_exact(&mut self, total: usize) -> Result<(), AllocError> {
        if total <= self.cap() {
            self.try_isolate()
        } else {
            self.try_reallocate(total)
        }
    }

    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        match self.len() {
            0 => self.clear_release(),
            len if len != self.cap() => self.try_reallocate(len)?,
            _ => {},
        }
        Ok(())
    }

    /// Releases the buffer entirely, dropping any values which aren't shared.
    fn clear_release(&mut self) {
        self.replace_buffer(Buffer::empty());
    }

    /// Returns the values as a mutable slice, copying them into a private buffer first if shared.
    pub fn try_make_mut(&mut self) -> Result<&mut [T], AllocError> {
        self.try_isolate()?;
        // SAFETY: The buffer has just been isolated (or is the sentinel with no values).
        Ok(unsafe { self.buf.as_mut_slice() })
    }

    /// Allocates a new buffer sized for `len` values with the grow policy and fills it with clones
    /// of each part in order.
    fn try_splice(&self, len: usize, parts: &[&[T]]) -> Result<Buffer<T, SLACK>, AllocError> {
        let mut fresh = Buffer::try_allocate(extra_capacity(len))?;
        for part in parts {
            // SAFETY: fresh is unshared and the parts add up to len values.
            unsafe { fresh.extend_cloned(part) };
        }
        Ok(fresh)
    }

    /// Replaces the contents with clones of `source`.
    pub fn try_assign(&mut self, source: &[T]) -> Result<(), AllocError> {
        if source.is_empty() {
            self.clear();
            return Ok(());
        }

        let len = self.len();
        if !self.buf.is_shared() && source.len() <= self.cap() {
            let common = len.min(source.len());
            // SAFETY: The buffer is unshared with capacity for all of source.
            unsafe {
                self.buf.as_mut_slice()[..common].clone_from_slice(&source[..common]);
                if source.len() < len {
                    self.truncate_unshared(source.len());
                } else {
                    self.buf.extend_cloned(&source[common..]);
                }
            }
        } else {
            let fresh = self.try_splice(source.len(), &[source])?;
            self.replace_buffer(fresh);
        }
        Ok(())
    }

    /// Overwrites the values starting at `index` with clones of `source`, extending the length if
    /// `source` runs past the end.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length.
    pub fn try_overwrite(&mut self, index: usize, source: &[T]) -> Result<(), AllocError> {
        self.check_position(index);
        if source.is_empty() {
            return Ok(());
        }

        let len = self.len();
        let end = index.checked_add(source.len()).ok_or(AllocError::CapacityOverflow)?;

        if !self.buf.is_shared() && end <= self.cap() {
            let overlap = end.min(len) - index;
            // SAFETY: The buffer is unshared and end fits within the capacity.
            unsafe {
                self.buf.as_mut_slice()[index..index + overlap].clone_from_slice(&source[..overlap]);
                self.buf.extend_cloned(&source[overlap..]);
            }
        } else {
            let values = self.as_slice();
            let tail = if end < len { &values[end..] } else { &[] };
            let fresh = self.try_splice(end.max(len), &[&values[..index], source, tail])?;
            self.replace_buffer(fresh);
        }
        Ok(())
    }

    /// Inserts clones of `source` at `index`, shifting the following values right.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length.
    pub fn try_insert(&mut self, index: usize, source: &[T]) -> Result<(), AllocError> {
        self.check_position(index);
        if source.is_empty() {
            return Ok(());
        }

        let len = self.len();
        let new_len = len.checked_add(source.len()).ok_or(AllocError::CapacityOverflow)?;

        if !self.buf.is_shared() && new_len <= self.cap() {
            // Moving the tail is a bitwise copy, so there is no construction cost to trade off
            // against the size of the gap.
            let mut gap = Gap::open(&mut self.buf, index, source.len());
            for value in source {
                gap.fill(value.clone());
            }
        } else {
            let values = self.as_slice();
            let fresh = self.try_splice(new_len, &[&values[..index], source, &values[index..]])?;
            self.replace_buffer(fresh);
        }
        Ok(())
    }

    /// Inserts a single owned value at `index`.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length.
    pub fn try_insert_one(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        self.check_position(index);
        let len = self.len();

        if !self.buf.is_shared() && len < self.cap() {
            let mut gap = Gap::open(&mut self.buf, index, 1);
            gap.fill(value);
        } else {
            let values = self.as_slice();
            let mut fresh = self.try_splice(len + 1, &[&values[..index]])?;
            // SAFETY: fresh has been sized for len + 1 values and holds index so far.
            unsafe {
                fresh.push_unchecked(value);
                fresh.extend_cloned(&values[index..]);
            }
            self.replace_buffer(fresh);
        }
        Ok(())
    }

    /// Appends clones of `source` to the end.
    pub fn try_append(&mut self, source: &[T]) -> Result<(), AllocError> {
        if source.is_empty() {
            return Ok(());
        }
        let total = self.len().checked_add(source.len()).ok_or(AllocError::CapacityOverflow)?;
        self.try_reserve(total)?;
        // SAFETY: try_reserve has left the buffer unshared with enough capacity.
        unsafe { self.buf.extend_cloned(source) };
        Ok(())
    }

    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        let total = self.len().checked_add(1).ok_or(AllocError::CapacityOverflow)?;
        self.try_reserve(total)?;
        // SAFETY: try_reserve has left the buffer unshared with enough capacity.
        unsafe { self.buf.push_unchecked(value) };
        Ok(())
    }

    /// Removes the last value. A shared buffer yields a clone and is copied without it.
    pub fn try_pop(&mut self) -> Result<Option<T>, AllocError> {
        let len = self.len();
        if len == 0 {
            return Ok(None);
        }

        if self.buf.is_shared() {
            let value = self.as_slice()[len - 1].clone();
            self.try_remove(len - 1, 1)?;
            Ok(Some(value))
        } else {
            // SAFETY: The buffer is unshared and the last value is initialized. The length is
            // reduced first, so the value is moved out rather than duplicated.
            unsafe {
                self.buf.set_len(len - 1);
                Ok(Some(self.buf.as_ptr().add(len - 1).read()))
            }
        }
    }

    /// Removes `count` values starting at `index`. A count which runs past the end is clamped.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length.
    pub fn try_remove(&mut self, index: usize, count: usize) -> Result<(), AllocError> {
        self.check_position(index);
        let len = self.len();
        let count = count.min(len - index);
        if count == 0 {
            return Ok(());
        }

        if !self.buf.is_shared() {
            // SAFETY: The buffer is unshared and index + count <= len.
            unsafe { self.remove_unshared(index, count) };
        } else if len == count {
            self.clear_release();
        } else {
            let values = self.as_slice();
            let fresh = self.try_splice(len - count, &[&values[..index], &values[index + count..]])?;
            self.replace_buffer(fresh);
        }
        Ok(())
    }

    pub fn try_truncate(&mut self, len: usize) -> Result<(), AllocError> {
        if len < self.len() {
            self.try_remove(len, self.len() - len)?;
        }
        Ok(())
    }

    /// # Safety
    /// The buffer must be unshared and `index + count <= len`.
    unsafe fn remove_unshared(&mut self, index: usize, count: usize) {
        let len = self.len();
        // SAFETY: The caller guarantees the range is initialized and the buffer is unshared. The
        // length is cut to index while dropping, so a panicking drop leaks the tail rather than
        // exposing dropped values.
        unsafe {
            let base = self.buf.as_ptr();
            self.buf.set_len(index);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(index), count));
            ptr::copy(base.add(index + count), base.add(index), len - index - count);
            self.buf.set_len(len - count);
        }
    }

    /// # Safety
    /// The buffer must be unshared and `len` no greater than the current length.
    unsafe fn truncate_unshared(&mut self, len: usize) {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.remove_unshared(len, self.len() - len) }
    }
}

/// An uninitialized gap of `count` slots opened at `index` by shifting the tail of an unshared
/// buffer right. The gap is filled one value at a time. If it is dropped before being completely
/// filled (because a clone panicked), the values written so far are dropped and the tail is moved
/// back.
struct Gap<'a, T, const SLACK: usize> {
    buf: &'a mut Buffer<T, SLACK>,
    index: usize,
    count: usize,
    filled: usize,
    tail: usize,
}

impl<'a, T, const SLACK: usize> Gap<'a, T, SLACK> {
    fn open(buf: &'a mut Buffer<T, SLACK>, index: usize, count: usize) -> Gap<'a, T, SLACK> {
        let len = buf.len();
        debug_assert!(!buf.is_shared() && len + count <= buf.cap());
        // SAFETY: The buffer is unshared with room for count more values. The length is cut to
        // index while the tail is detached, so nothing can observe the uninitialized gap.
        unsafe {
            let base = buf.as_ptr();
            buf.set_len(index);
            ptr::copy(base.add(index), base.add(index + count), len - index);
        }

        Gap {
            buf,
            index,
            count,
            filled: 0,
            tail: len - index,
        }
    }

    fn fill(&mut self, value: T) {
        debug_assert!(self.filled < self.count);
        // SAFETY: The slot is inside the gap and uninitialized.
        unsafe { self.buf.as_ptr().add(self.index + self.filled).write(value) };
        self.filled += 1;
    }
}

impl<T, const SLACK: usize> Drop for Gap<'_, T, SLACK> {
    fn drop(&mut self) {
        // SAFETY: Slots index..index + filled hold values written by fill and the tail sits at
        // index + count. Either the gap is full and everything is initialized, or the partial
        // values are dropped and the tail is shifted back to close the gap.
        unsafe {
            let base = self.buf.as_ptr();
            if self.filled == self.count {
                self.buf.set_len(self.index + self.count + self.tail);
            } else {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(self.index), self.filled));
                ptr::copy(base.add(self.index + self.count), base.add(self.index), self.tail);
                self.buf.set_len(self.index + self.tail);
            }
        }
    }
}
