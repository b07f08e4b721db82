//! Copy-on-write contiguous containers and the views that borrow them.
//!
//! [`SharedArray`] and [`SharedString`] are both a single pointer to a reference-counted
//! [buffer](crate::collections::shared). Cloning either one is O(1): the buffer is shared, and only
//! copied when one of the handles is first written to. [`ArraySlice`] and [`StringView`] borrow the
//! storage of a handle without touching its count.

mod cow;
mod lock;

pub mod array;
pub mod string;
pub mod view;

#[doc(inline)]
pub use array::SharedArray;
pub use lock::Locked;
#[doc(inline)]
pub use string::{SharedString, StringLock};
#[doc(inline)]
pub use view::{ArraySlice, Split, StringView};
