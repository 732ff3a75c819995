//! Foundation types for respatch.
//!
//! This crate provides the small value types shared by every other respatch
//! crate: how node content is identified and how resource types are named.
//!
//! # Key Types
//!
//! - [`ContentHash`] -- BLAKE3 hash of a node's reconstructed bytes
//! - [`ContentHasher`] -- Domain-separated hasher producing [`ContentHash`]es
//! - [`TypeTag`] -- Resource type of a node (archive, model, texture, ...)

pub mod error;
pub mod hash;
pub mod hasher;
pub mod tag;

pub use error::TypeError;
pub use hash::ContentHash;
pub use hasher::ContentHasher;
pub use tag::TypeTag;
