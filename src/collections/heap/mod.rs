//! A binary max-heap stored in a [`SharedArray`](crate::collections::contiguous::SharedArray), and
//! an in-place heap sort for shared arrays.

mod heap;
mod tests;

pub use heap::*;
