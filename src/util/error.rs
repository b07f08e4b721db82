use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, IsVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// The resource exhaustion condition raised by every operation that may allocate. This is the only
/// error that the containers produce at runtime, everything else is a programmer error and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, IsVariant)]
pub enum AllocError {
    /// The global allocator couldn't provide a block of `size` bytes.
    #[display("out of memory while allocating {size} bytes")]
    OutOfMemory { size: usize },
    /// The requested capacity can't be represented as a memory layout.
    #[display("capacity overflow")]
    CapacityOverflow,
}
