//! The bundle compiler and its staleness check.
//!
//! A `Compiler` owns one bundle: its files, the naming convention, the output
//! directory, and both filter chains. [`Compiler::generate`] names the
//! bundle, compares the newest source or watch file against the existing
//! artifact, and only rebuilds and rewrites it when the artifact is missing
//! or older. The artifact file on disk is the whole cache; nothing is kept
//! between calls.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};
use weld_common::path::absolutize;

use crate::artifact::Artifact;
use crate::collection::FileCollection;
use crate::error::CompileError;
use crate::filter::{run_file_filters, run_filters, FileFilter, Filter};
use crate::naming::{DefaultOutputNamingConvention, OutputNamingConvention};

/// Compiles the files of a [`FileCollection`] into one output artifact.
pub struct Compiler {
    /// Files of the bundle.
    collection: FileCollection,

    /// Strategy choosing the artifact filename.
    naming: Box<dyn OutputNamingConvention>,

    /// Validated, writable output directory.
    output_dir: PathBuf,

    /// Per-file filters, in registration order.
    file_filters: Vec<Box<dyn FileFilter>>,

    /// Bundle filters, in registration order.
    filters: Vec<Box<dyn Filter>>,

    /// Compare mtimes before regenerating. When off, every call rewrites.
    check_last_modified: bool,

    /// Always regenerate.
    debug: bool,

    // Presentation hints for renderers; the compiler never reads them.
    is_async: bool,
    defer: bool,
    nonce: Option<String>,
    absolute_url: bool,
}

impl Compiler {
    /// Creates a compiler writing into `output_dir`.
    ///
    /// Fails if the output directory does not exist, is not a directory, or
    /// is not writable.
    pub fn new(
        collection: FileCollection,
        naming: impl OutputNamingConvention + 'static,
        output_dir: impl AsRef<Path>,
    ) -> Result<Self, CompileError> {
        Ok(Self {
            collection,
            naming: Box::new(naming),
            output_dir: validate_output_dir(output_dir.as_ref())?,
            file_filters: Vec::new(),
            filters: Vec::new(),
            check_last_modified: true,
            debug: false,
            is_async: false,
            defer: false,
            nonce: None,
            absolute_url: false,
        })
    }

    /// Creates a compiler that names its output `<hash>.css`.
    pub fn css(
        collection: FileCollection,
        output_dir: impl AsRef<Path>,
    ) -> Result<Self, CompileError> {
        Self::new(collection, DefaultOutputNamingConvention::css(), output_dir)
    }

    /// Creates a compiler that names its output `<hash>.js`.
    pub fn js(
        collection: FileCollection,
        output_dir: impl AsRef<Path>,
    ) -> Result<Self, CompileError> {
        Self::new(collection, DefaultOutputNamingConvention::js(), output_dir)
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Replaces the output directory after validating it.
    ///
    /// On failure the previous directory is kept.
    pub fn set_output_dir(&mut self, output_dir: impl AsRef<Path>) -> Result<(), CompileError> {
        self.output_dir = validate_output_dir(output_dir.as_ref())?;
        Ok(())
    }

    /// Returns the file collection.
    pub fn collection(&self) -> &FileCollection {
        &self.collection
    }

    /// Returns the file collection for modification.
    pub fn collection_mut(&mut self) -> &mut FileCollection {
        &mut self.collection
    }

    /// Replaces the file collection, returning the previous one.
    pub fn set_collection(&mut self, collection: FileCollection) -> FileCollection {
        std::mem::replace(&mut self.collection, collection)
    }

    /// Returns the naming convention.
    pub fn naming_convention(&self) -> &dyn OutputNamingConvention {
        self.naming.as_ref()
    }

    /// Replaces the naming convention.
    pub fn set_naming_convention(&mut self, naming: impl OutputNamingConvention + 'static) {
        self.naming = Box::new(naming);
    }

    /// Appends a per-file filter.
    pub fn add_file_filter(&mut self, filter: impl FileFilter + 'static) {
        self.file_filters.push(Box::new(filter));
    }

    /// Appends a bundle filter.
    pub fn add_filter(&mut self, filter: impl Filter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Returns the number of registered per-file filters.
    pub fn file_filter_count(&self) -> usize {
        self.file_filters.len()
    }

    /// Returns the number of registered bundle filters.
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Returns whether mtimes are compared before regenerating.
    pub fn check_last_modified(&self) -> bool {
        self.check_last_modified
    }

    /// Enables or disables the mtime comparison.
    pub fn set_check_last_modified(&mut self, check: bool) {
        self.check_last_modified = check;
    }

    /// Returns whether every `generate` call rewrites the artifact.
    pub fn is_debugging(&self) -> bool {
        self.debug
    }

    /// Makes every `generate` call rewrite the artifact.
    pub fn enable_debugging(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Returns the `async` script hint.
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Sets the `async` script hint.
    pub fn set_async(&mut self, is_async: bool) -> &mut Self {
        self.is_async = is_async;
        self
    }

    /// Returns the `defer` script hint.
    pub fn is_defer(&self) -> bool {
        self.defer
    }

    /// Sets the `defer` script hint.
    pub fn set_defer(&mut self, defer: bool) -> &mut Self {
        self.defer = defer;
        self
    }

    /// Returns the CSP nonce emitted on rendered tags.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// Sets the CSP nonce emitted on rendered tags.
    pub fn set_nonce(&mut self, nonce: Option<String>) -> &mut Self {
        self.nonce = nonce;
        self
    }

    /// Returns whether renderers should emit absolute URLs.
    pub fn is_absolute_url(&self) -> bool {
        self.absolute_url
    }

    /// Sets whether renderers should emit absolute URLs.
    pub fn set_absolute_url(&mut self, absolute_url: bool) -> &mut Self {
        self.absolute_url = absolute_url;
        self
    }

    /// Returns the newest modification time among `files`.
    ///
    /// Defaults to the source files plus the watch files. Returns
    /// `UNIX_EPOCH` for an empty set.
    pub fn last_modified(&self, files: Option<&[PathBuf]>) -> Result<SystemTime, CompileError> {
        let watched;
        let files = match files {
            Some(files) => files,
            None => {
                watched = self.staleness_files();
                watched.as_slice()
            }
        };

        files
            .iter()
            .try_fold(UNIX_EPOCH, |newest, file| Ok(newest.max(modified(file)?)))
    }

    /// Builds the bundle content without writing anything.
    ///
    /// Defaults to the collection's files. Each file is read, passed through
    /// the file filters, and appended after a newline; the bundle filters
    /// then run once over the whole string.
    ///
    /// Sources must be UTF-8; anything else fails with
    /// [`CompileError::NotUtf8`] naming the file.
    pub fn content(&self, files: Option<&[PathBuf]>) -> Result<String, CompileError> {
        let files = files.unwrap_or_else(|| self.collection.files());

        let mut content = String::new();
        for file in files {
            let bytes = fs::read(file).map_err(|e| CompileError::Io {
                path: file.clone(),
                source: e,
            })?;
            let raw = String::from_utf8(bytes)
                .map_err(|_| CompileError::NotUtf8 { path: file.clone() })?;
            let filtered = run_file_filters(&self.file_filters, raw, self, file).map_err(
                |source| CompileError::Filter {
                    file: Some(file.clone()),
                    source,
                },
            )?;
            content.push('\n');
            content.push_str(&filtered);
        }

        run_filters(&self.filters, content, self)
            .map_err(|source| CompileError::Filter { file: None, source })
    }

    /// Generates the bundle if it is missing or stale.
    ///
    /// Returns `None` when the collection has no files. Otherwise returns the
    /// artifact descriptor, whether it was rewritten or already fresh. On
    /// error nothing is written and an existing artifact is left untouched.
    pub fn generate(&self) -> Result<Option<Artifact>, CompileError> {
        let files = self.collection.files();
        if files.is_empty() {
            debug!(output_dir = %self.output_dir.display(), "no source files, nothing to generate");
            return Ok(None);
        }

        let name = self.naming.filename(files, self);
        let path = self.output_dir.join(&name);

        if self.is_stale(&path)? {
            let content = self.content(None)?;
            write_atomic(&self.output_dir, &path, content.as_bytes())?;
            info!(file = %name, sources = files.len(), bytes = content.len(), "wrote bundle");
        } else {
            debug!(file = %name, "bundle is up to date");
        }

        let last_modified = modified(&path)?;
        Ok(Some(Artifact::new(name, path, last_modified, files.to_vec())))
    }

    /// Source files followed by watch files not already listed.
    fn staleness_files(&self) -> Vec<PathBuf> {
        let mut files = self.collection.files().to_vec();
        for watch in self.collection.watch_files() {
            if !files.contains(watch) {
                files.push(watch.clone());
            }
        }
        files
    }

    fn is_stale(&self, path: &Path) -> Result<bool, CompileError> {
        if !self.check_last_modified {
            debug!(file = %path.display(), "mtime check disabled, regenerating");
            return Ok(true);
        }
        if self.debug {
            debug!(file = %path.display(), "debug mode, regenerating");
            return Ok(true);
        }

        let artifact_modified = match fs::metadata(path) {
            Ok(meta) => meta.modified().map_err(|e| CompileError::Io {
                path: path.to_path_buf(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %path.display(), "bundle missing, generating");
                return Ok(true);
            }
            Err(e) => {
                return Err(CompileError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let newest = self.last_modified(None)?;
        Ok(newest > artifact_modified)
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("collection", &self.collection)
            .field("output_dir", &self.output_dir)
            .field("file_filters", &self.file_filters.len())
            .field("filters", &self.filters.len())
            .field("check_last_modified", &self.check_last_modified)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

fn validate_output_dir(dir: &Path) -> Result<PathBuf, CompileError> {
    let dir = absolutize(dir);
    let meta = fs::metadata(&dir).map_err(|_| CompileError::OutputDirNotFound {
        path: dir.clone(),
    })?;
    if !meta.is_dir() {
        return Err(CompileError::OutputDirNotADirectory { path: dir });
    }

    // A real file, not permission bits.
    tempfile::tempfile_in(&dir).map_err(|e| CompileError::OutputDirNotWritable {
        path: dir.clone(),
        source: e,
    })?;
    Ok(dir)
}

fn modified(path: &Path) -> Result<SystemTime, CompileError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| CompileError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Writes `data` to a temp file in `dir` and renames it over `path`.
fn write_atomic(dir: &Path, path: &Path, data: &[u8]) -> Result<(), CompileError> {
    let io_err = |source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(data).map_err(io_err)?;

    // NamedTempFile creates files as 0o600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
