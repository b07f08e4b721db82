//! Various general-purpose collection types.
//!
//! The contiguous containers share storage through a reference-counted buffer and implement
//! [`Deref<Target = [T]>`](std::ops::Deref), which provides most read-only slice functionality for
//! free. The ordered tree keeps its nodes in an arena, addressed by checked ids.

#[cfg(feature = "tree")]
pub mod binary_tree;
#[cfg(feature = "contiguous")]
pub mod contiguous;
#[cfg(feature = "heap")]
pub mod heap;
#[cfg(feature = "contiguous")]
pub mod shared;
