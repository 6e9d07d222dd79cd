//! Descriptor of a generated bundle file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A bundle written to (or already present in) the output directory.
///
/// Returned by every successful [`Compiler::generate`](crate::Compiler::generate)
/// call, whether or not the file was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    file: String,
    path: PathBuf,
    last_modified: SystemTime,
    source_files: Vec<PathBuf>,
}

impl Artifact {
    /// Creates an artifact descriptor.
    pub fn new(
        file: impl Into<String>,
        path: impl Into<PathBuf>,
        last_modified: SystemTime,
        source_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            last_modified,
            source_files,
        }
    }

    /// Returns the generated filename, without directory.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the full path of the generated file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the modification time of the generated file.
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    /// Returns the modification time as whole seconds since the Unix epoch.
    ///
    /// Used as a cache-busting query string by renderers.
    pub fn timestamp(&self) -> u64 {
        self.last_modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Returns the source files that were concatenated, in order.
    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }
}
