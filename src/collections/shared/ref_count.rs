#[cfg(not(feature = "atomic"))]
use std::cell::Cell;
#[cfg(feature = "atomic")]
use std::sync::atomic::{self, AtomicIsize, Ordering};

/// The reference count stored in every [`Header`](super::Header).
///
/// Values above 1 mean that the buffer is shared, exactly 1 means that a single handle owns it and
/// values at or below 0 mean that it is locked. When the `atomic` feature is enabled, the count is
/// updated atomically so that handles on different threads can share (and release) a buffer.
/// Nothing else about the buffer is synchronized.
pub(crate) struct RefCount {
    #[cfg(feature = "atomic")]
    count: AtomicIsize,
    #[cfg(not(feature = "atomic"))]
    count: Cell<isize>,
}

#[cfg(feature = "atomic")]
impl RefCount {
    pub const fn new(value: isize) -> RefCount {
        RefCount {
            count: AtomicIsize::new(value),
        }
    }

    pub fn get(&self) -> isize {
        // Acquire pairs with the release in decrement, so that a handle observing a count of 1 also
        // observes every write made through the handles that have since been released.
        self.count.load(Ordering::Acquire)
    }

    pub fn set(&self, value: isize) {
        self.count.store(value, Ordering::Release);
    }

    pub fn increment(&self) {
        // A new reference can only be made from an existing one, so no synchronization is required.
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrements the count, returning true if the buffer is still referenced afterwards.
    pub fn decrement(&self) -> bool {
        if self.count.fetch_sub(1, Ordering::Release) != 1 {
            return true;
        }
        atomic::fence(Ordering::Acquire);
        false
    }
}

#[cfg(not(feature = "atomic"))]
impl RefCount {
    pub const fn new(value: isize) -> RefCount {
        RefCount {
            count: Cell::new(value),
        }
    }

    pub fn get(&self) -> isize {
        self.count.get()
    }

    pub fn set(&self, value: isize) {
        self.count.set(value);
    }

    pub fn increment(&self) {
        self.count.set(self.count.get() + 1);
    }

    /// Decrements the count, returning true if the buffer is still referenced afterwards.
    pub fn decrement(&self) -> bool {
        let value = self.count.get() - 1;
        self.count.set(value);
        value != 0
    }
}
