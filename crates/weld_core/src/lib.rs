//! Compilation and caching engine for static asset bundles.
//!
//! A [`Compiler`] takes the ordered source files of a [`FileCollection`],
//! runs them through per-file and bundle filters, and writes the result to an
//! output directory under a name chosen by an [`OutputNamingConvention`]. The
//! artifact is only rewritten when a source or watch file is newer than the
//! existing output.

#![warn(missing_docs)]

pub mod artifact;
pub mod collection;
pub mod compiler;
pub mod error;
pub mod filter;
pub mod naming;

pub use artifact::Artifact;
pub use collection::FileCollection;
pub use compiler::Compiler;
pub use error::{CompileError, FilterError};
pub use filter::{FileFilter, Filter};
pub use naming::{DefaultOutputNamingConvention, OutputNamingConvention};
