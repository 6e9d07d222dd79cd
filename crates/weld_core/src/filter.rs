//! Content filters.
//!
//! File filters see one source file at a time, together with its path, and
//! run before concatenation. Bundle filters see the concatenated result once.
//! Both kinds run in registration order, each receiving the previous output.

use std::path::Path;

use crate::compiler::Compiler;
use crate::error::FilterError;

/// A transform applied to each source file before concatenation.
///
/// Implemented for closures of the form
/// `|content: String, compiler: &Compiler, file: &Path| -> Result<String, FilterError>`.
pub trait FileFilter: Send + Sync {
    /// Transforms the content of `file`.
    fn apply(&self, content: String, compiler: &Compiler, file: &Path)
        -> Result<String, FilterError>;
}

impl<F> FileFilter for F
where
    F: Fn(String, &Compiler, &Path) -> Result<String, FilterError> + Send + Sync,
{
    fn apply(
        &self,
        content: String,
        compiler: &Compiler,
        file: &Path,
    ) -> Result<String, FilterError> {
        self(content, compiler, file)
    }
}

/// A transform applied once to the concatenated bundle.
///
/// Implemented for closures of the form
/// `|content: String, compiler: &Compiler| -> Result<String, FilterError>`.
pub trait Filter: Send + Sync {
    /// Transforms the bundle content.
    fn apply(&self, content: String, compiler: &Compiler) -> Result<String, FilterError>;
}

impl<F> Filter for F
where
    F: Fn(String, &Compiler) -> Result<String, FilterError> + Send + Sync,
{
    fn apply(&self, content: String, compiler: &Compiler) -> Result<String, FilterError> {
        self(content, compiler)
    }
}

/// Runs `content` through every file filter in order.
pub(crate) fn run_file_filters(
    filters: &[Box<dyn FileFilter>],
    mut content: String,
    compiler: &Compiler,
    file: &Path,
) -> Result<String, FilterError> {
    for filter in filters {
        content = filter.apply(content, compiler, file)?;
    }
    Ok(content)
}

/// Runs `content` through every bundle filter in order.
pub(crate) fn run_filters(
    filters: &[Box<dyn Filter>],
    mut content: String,
    compiler: &Compiler,
) -> Result<String, FilterError> {
    for filter in filters {
        content = filter.apply(content, compiler)?;
    }
    Ok(content)
}
