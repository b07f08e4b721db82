//! Copy-on-write containers and an ordered binary tree.
//!
//! # Purpose
//! The core of this crate is a single reference-counted buffer, shared by a dynamic array
//! ([`SharedArray`](collections::contiguous::SharedArray)) and a byte string
//! ([`SharedString`](collections::contiguous::SharedString)). Cloning a handle only bumps a count.
//! The values are copied the first time one of the handles is written to, so passing containers
//! around by value is cheap and every handle still behaves like it owns its contents.
//!
//! Alongside those are borrowed views ([`ArraySlice`](collections::contiguous::ArraySlice) and
//! [`StringView`](collections::contiguous::StringView)), an unbalanced binary search tree with set
//! and map wrappers ([`collections::binary_tree`]) and a binary heap built on the shared array
//! ([`collections::heap`]).
//!
//! # Error Handling
//! Running out of memory is the only error that the containers report at runtime. Every operation
//! that may allocate has a `try_` variant returning [`AllocError`], and a
//! plain variant which panics with the error message instead. Out of bounds indices are programmer
//! errors: they are always checked and always panic.
//!
//! Nothing is partially applied. A mutation that needs a new buffer builds it completely before
//! swapping it in, so a failed allocation (or a panicking [`Clone`]) leaves the container unchanged.
//!
//! # Features
//! - `atomic` (default): The reference count is atomic and handles are [`Send`] and [`Sync`].
//!   Without it, the count is a plain [`Cell`](std::cell::Cell) and handles are confined to one
//!   thread.
//! - `contiguous`, `tree`, `heap` (all enabled through `collections-all`): The container families.
//! - `codec` (default): Base64 encoding into [`SharedString`](collections::contiguous::SharedString),
//!   via the `base64` crate.
//!
//! # Logging
//! The slow paths (allocation, copy on write, growth and allocation failure) emit [`tracing`]
//! events at `trace` and `debug` level. No subscriber is installed by this crate.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;

#[cfg(feature = "codec")]
pub mod codec;

pub(crate) mod util;

pub use util::error::{AllocError, IndexOutOfBounds};
