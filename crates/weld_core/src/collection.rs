//! The ordered set of files that make up one bundle.

use std::path::{Path, PathBuf};

use weld_common::path::{absolutize, normalize};

use crate::error::CompileError;

/// Source files, remote references, and watch files of one bundle.
///
/// All three lists keep insertion order and ignore duplicates. Local paths
/// are stored absolute and lexically normalized, so two spellings of the same
/// file collapse to one entry. The order of [`files`](Self::files) is the
/// concatenation order of the bundle.
#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    root: PathBuf,
    files: Vec<PathBuf>,
    remote_files: Vec<String>,
    watch_files: Vec<PathBuf>,
}

impl FileCollection {
    /// Creates an empty collection resolving relative paths against `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: absolutize(root.as_ref()),
            ..Self::default()
        }
    }

    /// Returns the base directory used for relative paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the source files in concatenation order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns the remote file URLs.
    pub fn remote_files(&self) -> &[String] {
        &self.remote_files
    }

    /// Returns the explicit watch files.
    pub fn watch_files(&self) -> &[PathBuf] {
        &self.watch_files
    }

    /// Resolves a path to its absolute, normalized form.
    ///
    /// Absolute paths are used as given. Relative paths are tried against the
    /// collection root first and then against the working directory. The
    /// path must exist.
    pub fn canonicalize_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, CompileError> {
        let path = path.as_ref();
        let root_relative = normalize(&self.root.join(path));

        if path.is_absolute() {
            let candidate = normalize(path);
            if candidate.exists() {
                return Ok(candidate);
            }
        } else {
            if root_relative.exists() {
                return Ok(root_relative);
            }
            let candidate = absolutize(path);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(CompileError::FileNotFound {
            path: path.to_path_buf(),
            root_relative,
        })
    }

    /// Appends a source file unless it is already present.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<(), CompileError> {
        let file = self.canonicalize_path(path)?;
        push_unique(&mut self.files, file);
        Ok(())
    }

    /// Appends several source files, stopping at the first missing one.
    pub fn add_files<I, P>(&mut self, paths: I) -> Result<(), CompileError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_file(path)?;
        }
        Ok(())
    }

    /// Removes a source file. Absent paths are ignored.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let target = self.lookup_key(path.as_ref());
        self.files.retain(|f| *f != target);
    }

    /// Removes several source files.
    pub fn remove_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.remove_file(path);
        }
    }

    /// Appends a remote URL unless it is already present.
    pub fn add_remote_file(&mut self, url: impl Into<String>) {
        push_unique(&mut self.remote_files, url.into());
    }

    /// Appends several remote URLs.
    pub fn add_remote_files<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for url in urls {
            self.add_remote_file(url);
        }
    }

    /// Appends a watch file unless it is already present.
    pub fn add_watch_file(&mut self, path: impl AsRef<Path>) -> Result<(), CompileError> {
        let file = self.canonicalize_path(path)?;
        push_unique(&mut self.watch_files, file);
        Ok(())
    }

    /// Appends several watch files, stopping at the first missing one.
    pub fn add_watch_files<I, P>(&mut self, paths: I) -> Result<(), CompileError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_watch_file(path)?;
        }
        Ok(())
    }

    /// Removes every source file, remote URL, and watch file.
    pub fn clear(&mut self) {
        self.files.clear();
        self.remote_files.clear();
        self.watch_files.clear();
    }

    /// Returns `true` if the collection has no source files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    // A file deleted after registration can still be removed by name.
    fn lookup_key(&self, path: &Path) -> PathBuf {
        self.canonicalize_path(path).unwrap_or_else(|_| {
            if path.is_absolute() {
                normalize(path)
            } else {
                normalize(&self.root.join(path))
            }
        })
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
