//! Encodings over [`SharedString`](crate::collections::contiguous::SharedString).
//!
//! These are thin adapters around external codec crates. They exist so that encoded text lands
//! straight in a shared, terminated buffer without an intermediate [`String`].

pub mod base64;
mod tests;
