//! An unbalanced binary search tree with stable node ids, and the [`TreeSet`] and [`TreeMap`]
//! wrappers built on it.
//!
//! [`BinaryTree`] is generic over a [`KeyExtractor`], which decides what part of each value the tree
//! is ordered by. Nodes are stored in an arena and refer to each other by index, rather than being
//! boxed individually.

mod arena;
mod iter;
mod key;
pub mod map;
pub mod set;
mod tests;
mod tree;

pub(crate) use arena::{Arena, Node};
pub use arena::NodeId;
pub use iter::*;
pub use key::*;
#[doc(inline)]
pub use map::TreeMap;
#[doc(inline)]
pub use set::TreeSet;
pub use tree::*;
