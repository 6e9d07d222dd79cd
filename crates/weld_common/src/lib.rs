//! Shared foundational types used across the weld asset pipeline.
//!
//! This crate provides content hashing for output naming and lexical path
//! normalization used by the file registry and the CSS url filter.

#![warn(missing_docs)]

pub mod hash;
pub mod path;

pub use hash::ContentHash;
pub use path::{absolutize, normalize, normalize_slashed};
