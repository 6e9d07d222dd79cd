//! Stylesheet and script minification.

use std::path::Path;

use weld_core::{Compiler, FileFilter, Filter, FilterError};

/// Minifies CSS with [`minifier::css`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinFilter;

impl CssMinFilter {
    /// Creates the filter.
    pub fn new() -> Self {
        Self
    }

    /// Minifies `code`.
    pub fn apply(&self, code: &str) -> Result<String, FilterError> {
        minifier::css::minify(code)
            .map(|minified| minified.to_string())
            .map_err(|e| FilterError::failed(format!("css minification failed: {e}")))
    }
}

impl Filter for CssMinFilter {
    fn apply(&self, content: String, _compiler: &Compiler) -> Result<String, FilterError> {
        CssMinFilter::apply(self, &content)
    }
}

impl FileFilter for CssMinFilter {
    fn apply(
        &self,
        content: String,
        _compiler: &Compiler,
        _file: &Path,
    ) -> Result<String, FilterError> {
        CssMinFilter::apply(self, &content)
    }
}

/// Minifies JavaScript with [`minifier::js`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinFilter;

impl JsMinFilter {
    /// Creates the filter.
    pub fn new() -> Self {
        Self
    }

    /// Minifies `code`.
    pub fn apply(&self, code: &str) -> String {
        minifier::js::minify(code).to_string()
    }
}

impl Filter for JsMinFilter {
    fn apply(&self, content: String, _compiler: &Compiler) -> Result<String, FilterError> {
        Ok(JsMinFilter::apply(self, &content))
    }
}

impl FileFilter for JsMinFilter {
    fn apply(
        &self,
        content: String,
        _compiler: &Compiler,
        _file: &Path,
    ) -> Result<String, FilterError> {
        Ok(JsMinFilter::apply(self, &content))
    }
}
