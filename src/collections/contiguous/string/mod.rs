//! A module containing [`SharedString`], a byte string with copy-on-write sharing, and its lock
//! guard, [`StringLock`].
//!
//! [`SharedString`] is also re-exported under the parent module.

mod lock;
mod string;

pub use lock::*;
pub use string::*;
