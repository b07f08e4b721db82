use std::fmt::{self, Debug, Formatter};
use std::mem::MaybeUninit;
use std::ops::{Deref, DerefMut};
use std::slice;

use crate::collections::shared::Buffer;

/// Exclusive, uncounted access to the buffer of a [`SharedArray`](super::SharedArray) (or, through
/// [`StringLock`](super::StringLock), a [`SharedString`](super::SharedString)).
///
/// Locking first makes the buffer private to its handle and then drops the reference count to 0,
/// marking the buffer as locked. While locked, the holder may read and write values and change the
/// length anywhere within the existing capacity, but it can never reallocate. This is intended for
/// algorithms (sorting, heap maintenance, filling from a foreign API) which would otherwise pay for
/// bookkeeping on every element.
///
/// The lock mutably borrows the handle, so the handle can't be shared, cloned or locked again until
/// the lock is dropped. Dropping it (or calling [`unlock`](Locked::unlock)) restores the count and
/// commits whatever length was last set.
///
/// Locking an empty handle that has no allocation yields a lock with a capacity of 0.
pub struct Locked<'a, T, const SLACK: usize = 0> {
    pub(crate) buf: &'a mut Buffer<T, SLACK>,
    counted: bool,
}

impl<'a, T, const SLACK: usize> Locked<'a, T, SLACK> {
    /// Locks an unshared buffer (or the sentinel, which is never counted).
    pub(crate) fn acquire(buf: &'a mut Buffer<T, SLACK>) -> Locked<'a, T, SLACK> {
        let counted = !buf.is_sentinel();
        if counted {
            debug_assert_eq!(buf.refs(), 1, "Only an unshared buffer can be locked!");
            buf.header().refs.set(0);
        }
        Locked {
            buf,
            counted,
        }
    }

    /// Returns the number of initialized values.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if there are no initialized values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity of the locked buffer, which can't change while locked.
    pub fn capacity(&self) -> usize {
        self.buf.cap()
    }

    /// Returns the uninitialized slots between the length and the capacity.
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        let len = self.len();
        let spare = self.capacity() - len;
        if spare == 0 {
            return &mut [];
        }
        // SAFETY: The buffer is locked (and therefore exclusively ours) and the slots from len to
        // cap are within the allocation.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr().add(len).cast(), spare) }
    }

    /// Sets the length of the locked buffer.
    ///
    /// # Safety
    /// `len` must not exceed [`capacity`](Locked::capacity) and the first `len` values must be
    /// initialized. Values beyond the new length are forgotten, not dropped.
    pub unsafe fn set_len(&mut self, len: usize) {
        // SAFETY: The buffer is locked, which means it isn't shared. The rest is guaranteed by the
        // caller.
        unsafe { self.buf.set_len(len) }
    }

    /// Appends `value` if there is spare capacity, otherwise gives it back.
    ///
    /// # Errors
    /// Returns `value` if the locked buffer is full.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.len() == self.capacity() {
            return Err(value);
        }
        // SAFETY: There is spare capacity and the buffer is exclusively ours.
        unsafe { self.buf.push_unchecked(value) };
        Ok(())
    }

    /// Removes and returns the last value.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len().checked_sub(1)?;
        // SAFETY: The value at len is initialized and the length is reduced before it is read, so
        // it is moved out rather than duplicated.
        unsafe {
            self.buf.set_len(len);
            Some(self.buf.as_ptr().add(len).read())
        }
    }

    /// Drops every value past `len`.
    pub fn truncate(&mut self, len: usize) {
        while self.len() > len {
            drop(self.pop());
        }
    }

    /// Unlocks the buffer, committing the current length.
    pub fn unlock(self) {
        drop(self)
    }

    /// Sets the length and unlocks the buffer.
    ///
    /// # Safety
    /// See [`set_len`](Locked::set_len).
    pub unsafe fn unlock_with_len(mut self, len: usize) {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.set_len(len) };
    }
}

impl<T, const SLACK: usize> Drop for Locked<'_, T, SLACK> {
    fn drop(&mut self) {
        if self.counted {
            debug_assert!(self.buf.is_locked(), "Buffer was unlocked twice!");
            // The handle holding the lock is the only one, so unlocking always leaves it unshared.
            self.buf.header().refs.set(1);
        }
    }
}

impl<T, const SLACK: usize> Deref for Locked<'_, T, SLACK> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.buf.as_slice()
    }
}

impl<T, const SLACK: usize> DerefMut for Locked<'_, T, SLACK> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: A locked buffer is exclusively owned by the lock.
        unsafe { self.buf.as_mut_slice() }
    }
}

impl<T: Debug, const SLACK: usize> Debug for Locked<'_, T, SLACK> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locked")
            .field("contents", &&**self)
            .field("len", &self.len())
            .field("cap", &self.capacity())
            .finish()
    }
}
