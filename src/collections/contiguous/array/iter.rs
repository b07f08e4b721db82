use std::iter::FusedIterator;
use std::ptr;

use super::SharedArray;
use crate::collections::shared::Buffer;

impl<T: Clone> IntoIterator for SharedArray<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    /// Creates an owned iterator. If this was the only handle to the buffer, values are moved out.
    /// Otherwise they are cloned, leaving the other handles untouched.
    fn into_iter(self) -> Self::IntoIter {
        let mut buf = self.inner.buf;
        let back = buf.len();
        let owned = !buf.is_shared();

        if owned {
            // SAFETY: The buffer is unshared. From here on, the iterator is responsible for the
            // values, so the length is zeroed to stop the buffer from dropping them as well.
            unsafe { buf.set_len(0) };
        }

        IntoIter {
            buf,
            front: 0,
            back,
            owned,
        }
    }
}

impl<'a, T> IntoIterator for &'a SharedArray<T> {
    type Item = &'a T;

    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// An owned iterator over the values of a [`SharedArray`]. See [`SharedArray::into_iter`].
pub struct IntoIter<T> {
    buf: Buffer<T, 0>,
    front: usize,
    back: usize,
    owned: bool,
}

impl<T: Clone> IntoIter<T> {
    /// # Safety
    /// `index` must be within `front..back` and must not be taken again.
    unsafe fn read_at(&self, index: usize) -> T {
        // SAFETY: Values in front..back are initialized. An owned buffer's values are moved out
        // exactly once, while a shared buffer's are only ever cloned.
        unsafe {
            let slot = self.buf.as_ptr().add(index);
            if self.owned {
                slot.read()
            } else {
                (*slot).clone()
            }
        }
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: front < back and is advanced straight away.
        let value = unsafe { self.read_at(self.front) };
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T: Clone> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: back has just been decremented and is still >= front.
        Some(unsafe { self.read_at(self.back) })
    }
}

impl<T: Clone> FusedIterator for IntoIter<T> {}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        if self.owned {
            // SAFETY: Values in front..back haven't been moved out yet and are dropped exactly once.
            // The buffer itself has a length of 0, so it only deallocates.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.buf.as_ptr().add(self.front),
                    self.back - self.front,
                ));
            }
        }
    }
}
