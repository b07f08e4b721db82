//! The reference-counted storage that backs [`SharedArray`](super::contiguous::SharedArray) and
//! [`SharedString`](super::contiguous::SharedString).
//!
//! A [`Buffer`] is a single heap allocation holding a small [`Header`] (reference count, capacity
//! and length) immediately followed by the element storage. Every container handle owns exactly one
//! counted reference to a Buffer, and empty handles all refer to one static sentinel which is never
//! counted or freed.

mod buffer;
mod growth;
mod ref_count;
mod tests;

pub(crate) use buffer::*;
pub use growth::*;
pub(crate) use ref_count::*;
