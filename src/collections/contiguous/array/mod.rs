//! A module containing [`SharedArray`] and its owned iterator, [`IntoIter`].
//!
//! [`Iter`](std::slice::Iter) and [`IterMut`](std::slice::IterMut) from [`std::slice`] are used for
//! borrowed iteration, through [`Deref<Target = [T]>`](std::ops::Deref).
//!
//! [`SharedArray`] is also re-exported under the parent module.

mod array;
mod iter;
mod tests;

pub use array::*;
pub use iter::*;
