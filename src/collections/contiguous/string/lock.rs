use std::fmt::{self, Debug, Formatter};
use std::ops::{Deref, DerefMut};

use crate::collections::contiguous::{Locked, StringView};

/// A lock on the buffer of a [`SharedString`](super::SharedString).
///
/// This behaves exactly like [`Locked`], which it dereferences to, except that the terminator isn't
/// maintained until the lock is dropped. At that point a 0 is written directly after the committed
/// length.
pub struct StringLock<'a> {
    locked: Locked<'a, u8, 1>,
}

impl<'a> StringLock<'a> {
    pub(crate) fn new(locked: Locked<'a, u8, 1>) -> StringLock<'a> {
        StringLock {
            locked,
        }
    }

    /// Unlocks the buffer, committing the current length and restoring the terminator.
    pub fn unlock(self) {
        drop(self)
    }
}

impl<'a> Deref for StringLock<'a> {
    type Target = Locked<'a, u8, 1>;

    fn deref(&self) -> &Self::Target {
        &self.locked
    }
}

impl DerefMut for StringLock<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.locked
    }
}

impl Drop for StringLock<'_> {
    fn drop(&mut self) {
        let buf = &mut *self.locked.buf;
        if !buf.is_sentinel() {
            // SAFETY: The buffer is locked, so this is the only handle that can write to it. The
            // terminator slot at len is within the single slack byte past the capacity.
            unsafe { buf.as_ptr().add(buf.len()).write(0) }
        }
    }
}

impl Debug for StringLock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringLock")
            .field("contents", &StringView::new(&self.locked))
            .field("len", &self.locked.len())
            .field("cap", &self.locked.capacity())
            .finish()
    }
}
