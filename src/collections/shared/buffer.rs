use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use super::RefCount;
use crate::util::error::AllocError;

/// The count given to the static sentinel. It is never modified, but it sits far above 1 so that
/// the sentinel always reads as shared and every write to an empty handle allocates first.
const IMMORTAL: isize = isize::MAX / 2;

/// The maximum element alignment supported by the sentinel.
const SENTINEL_ALIGN: usize = 64;

/// The bookkeeping stored at the start of every allocation, immediately before the payload.
#[repr(C)]
pub(crate) struct Header {
    pub refs: RefCount,
    pub cap: usize,
    pub len: usize,
}

/// The shared empty buffer. The zeroed tail covers the payload offset of any element type aligned
/// to at most [`SENTINEL_ALIGN`] bytes, so a string terminator read from it is always 0.
#[repr(C, align(64))]
struct Sentinel {
    header: Header,
    tail: [u8; SENTINEL_ALIGN],
}

// SAFETY: The sentinel is never written to. Buffer checks for it before touching the count or the
// length, so sharing it between threads only ever involves reads.
unsafe impl Sync for Sentinel {}

static EMPTY: Sentinel = Sentinel {
    header: Header {
        refs: RefCount::new(IMMORTAL),
        cap: 0,
        len: 0,
    },
    tail: [0; SENTINEL_ALIGN],
};

/// A counted reference to a single heap allocation containing a [`Header`] followed by storage for
/// `cap + SLACK` values of `T`, of which the first `len` are initialized.
///
/// `SLACK` is storage that isn't reported as capacity. Strings use a single slack byte for their
/// terminator, arrays have none.
///
/// Cloning a Buffer shares the allocation and dropping one releases it. The allocation (and every
/// initialized value) is dropped once the last reference is released. Buffer itself doesn't enforce
/// copy-on-write, it only reports whether writing is allowed: writes are only valid through a
/// Buffer which isn't [shared](Buffer::is_shared).
pub(crate) struct Buffer<T, const SLACK: usize = 0> {
    header: NonNull<Header>,
    _phantom: PhantomData<T>,
}

impl<T, const SLACK: usize> Buffer<T, SLACK> {
    /// Returns a reference to the static empty buffer. This never allocates.
    pub fn empty() -> Buffer<T, SLACK> {
        const {
            assert!(
                align_of::<T>() <= SENTINEL_ALIGN,
                "Element alignment exceeds the supported maximum!"
            )
        };

        Buffer {
            header: NonNull::from(&EMPTY.header),
            _phantom: PhantomData,
        }
    }

    /// Allocates a new, unshared buffer with room for exactly `cap` values and a length of 0.
    ///
    /// A capacity of 0 returns the sentinel rather than a zero-capacity allocation.
    ///
    /// # Errors
    /// Returns [`AllocError::CapacityOverflow`] if the layout size would exceed [`isize::MAX`] and
    /// [`AllocError::OutOfMemory`] if the global allocator fails.
    pub fn try_allocate(cap: usize) -> Result<Buffer<T, SLACK>, AllocError> {
        if cap == 0 {
            return Ok(Self::empty());
        }

        let layout = Self::make_layout(cap)?;

        // SAFETY: The layout always has a non-zero size because it contains a Header.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(header) = NonNull::new(raw.cast::<Header>()) else {
            tracing::debug!(cap, size = layout.size(), "shared buffer allocation failed");
            return Err(AllocError::OutOfMemory { size: layout.size() });
        };

        // SAFETY: header was just allocated with a layout that starts with a Header.
        unsafe {
            header.write(Header {
                refs: RefCount::new(1),
                cap,
                len: 0,
            });
        }
        tracing::trace!(cap, size = layout.size(), "allocated shared buffer");

        Ok(Buffer {
            header,
            _phantom: PhantomData,
        })
    }

    /// Creates the layout for a buffer of the provided capacity.
    fn make_layout(cap: usize) -> Result<Layout, AllocError> {
        let payload_len = cap.checked_add(SLACK).ok_or(AllocError::CapacityOverflow)?;
        let payload = Layout::array::<T>(payload_len).map_err(|_| AllocError::CapacityOverflow)?;
        let (layout, _) = Layout::new::<Header>()
            .extend(payload)
            .map_err(|_| AllocError::CapacityOverflow)?;
        Ok(layout.pad_to_align())
    }

    /// The distance from the start of the header to the first value, as computed by
    /// [`Layout::extend`].
    const fn payload_offset() -> usize {
        size_of::<Header>().next_multiple_of(align_of::<T>())
    }

    pub fn header(&self) -> &Header {
        // SAFETY: header always points to either the sentinel or a live allocation which this
        // Buffer holds a reference to.
        unsafe { self.header.as_ref() }
    }

    pub fn len(&self) -> usize {
        self.header().len
    }

    pub fn cap(&self) -> usize {
        self.header().cap
    }

    pub fn refs(&self) -> isize {
        self.header().refs.get()
    }

    pub fn is_sentinel(&self) -> bool {
        ptr::eq(self.header.as_ptr(), &EMPTY.header)
    }

    /// Returns true if another handle refers to this buffer. The sentinel always counts as shared.
    pub fn is_shared(&self) -> bool {
        self.refs() > 1
    }

    /// Returns true if this buffer has been handed out through a lock and not yet unlocked.
    pub fn is_locked(&self) -> bool {
        self.refs() <= 0
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.header == other.header
    }

    /// Returns a pointer to the first value in the payload. For the sentinel, this pointer must
    /// only be used for reads.
    pub fn as_ptr(&self) -> *mut T {
        // SAFETY: The payload starts payload_offset bytes after the header, within the allocation
        // (or within the sentinel's tail).
        unsafe { self.header.as_ptr().cast::<u8>().add(Self::payload_offset()).cast::<T>() }
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first len values are initialized and properly aligned. The returned lifetime
        // is tied to self, which keeps the allocation alive.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// Returns the initialized values as a mutable slice.
    ///
    /// # Safety
    /// The buffer must not be shared.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [T] {
        debug_assert!(!self.is_shared() || self.len() == 0);
        if self.len() == 0 {
            return &mut [];
        }
        // SAFETY: The caller guarantees that this handle is the only one referring to the buffer,
        // and the first len values are initialized.
        unsafe { slice::from_raw_parts_mut(self.as_ptr(), self.len()) }
    }

    /// Sets the length stored in the header. Setting a length of 0 on the sentinel is a no-op.
    ///
    /// # Safety
    /// The buffer must not be shared, `len` must not exceed the capacity and the first `len` values
    /// must be initialized.
    pub unsafe fn set_len(&mut self, len: usize) {
        if self.is_sentinel() {
            debug_assert_eq!(len, 0, "Cannot set the length of the empty sentinel!");
            return;
        }
        debug_assert!(!self.is_shared());
        debug_assert!(len <= self.cap());
        // SAFETY: The caller guarantees that no other handle refers to this buffer, so writing the
        // length through the raw pointer doesn't race with anything.
        unsafe { (*self.header.as_ptr()).len = len }
    }

    /// Writes `value` directly after the last initialized value.
    ///
    /// # Safety
    /// The buffer must not be shared and must have spare capacity.
    pub unsafe fn push_unchecked(&mut self, value: T) {
        let len = self.len();
        debug_assert!(len < self.cap());
        // SAFETY: len < cap, so the slot is within the allocation and uninitialized.
        unsafe {
            self.as_ptr().add(len).write(value);
            self.set_len(len + 1);
        }
    }

    /// Writes a clone of every value from `source` after the last initialized value. The length is
    /// bumped after every clone, so a panicking clone leaves the buffer consistent.
    ///
    /// # Safety
    /// The buffer must not be shared and must have spare capacity for all of `source`.
    pub unsafe fn extend_cloned(&mut self, source: &[T])
    where
        T: Clone,
    {
        debug_assert!(self.len() + source.len() <= self.cap());
        for value in source {
            // SAFETY: The caller guarantees enough spare capacity for every value in source.
            unsafe { self.push_unchecked(value.clone()) }
        }
    }
}

impl<T, const SLACK: usize> Clone for Buffer<T, SLACK> {
    /// Shares the buffer with a new handle by incrementing the reference count.
    ///
    /// # Panics
    /// Panics if the buffer is locked. That is only reachable by leaking a lock, and counting a
    /// locked buffer up from 0 would make two handles look unshared.
    #[track_caller]
    fn clone(&self) -> Self {
        if !self.is_sentinel() {
            assert!(!self.is_locked(), "Cannot share a locked buffer!");
            self.header().refs.increment();
        }

        Buffer {
            header: self.header,
            _phantom: PhantomData,
        }
    }
}

impl<T, const SLACK: usize> Drop for Buffer<T, SLACK> {
    fn drop(&mut self) {
        if self.is_sentinel() || self.header().refs.decrement() {
            return;
        }

        let cap = self.cap();
        // SAFETY: This was the last reference, so the first len values are initialized and nothing
        // else can observe them being dropped.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_ptr(), self.len()));
        }

        let Ok(layout) = Self::make_layout(cap) else {
            unreachable!("The layout was valid when the buffer was allocated.")
        };
        // SAFETY: The allocation was made by the global allocator with this exact layout.
        unsafe { alloc::dealloc(self.header.as_ptr().cast(), layout) }
    }
}

// SAFETY: With an atomic reference count, handles on different threads may share a buffer. Values
// are reachable from every handle, so T needs to be both Send and Sync, the same as for Arc<T>.
#[cfg(feature = "atomic")]
unsafe impl<T: Send + Sync, const SLACK: usize> Send for Buffer<T, SLACK> {}
// SAFETY: Shared access to a Buffer only reads values and atomically updates the count.
#[cfg(feature = "atomic")]
unsafe impl<T: Send + Sync, const SLACK: usize> Sync for Buffer<T, SLACK> {}
