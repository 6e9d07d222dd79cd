//! Rewriting of relative `url(...)` references in stylesheets.
//!
//! Once stylesheets are concatenated into the output directory, a relative
//! `url(../img/logo.png)` no longer points where its author meant. This
//! filter rewrites such references into absolute public paths computed from
//! the source file's location under the document root.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use weld_common::path::{absolutize, normalize_slashed};
use weld_core::{Compiler, FileFilter, FilterError};

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\burl\(\s*(?:'([^']*)'|"([^"]*)"|([^'"()\s]*))\s*\)"#)
            .expect("url pattern is valid")
    })
}

fn absolute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*:|/|#)").expect("absolute pattern is valid")
    })
}

/// File filter that absolutizes relative urls in CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssUrlsFilter {
    doc_root: PathBuf,
    base_path: String,
}

impl CssUrlsFilter {
    /// Creates a filter for files served from `doc_root` under `base_path`.
    pub fn new(doc_root: impl AsRef<Path>, base_path: impl Into<String>) -> Self {
        Self {
            doc_root: absolutize(doc_root.as_ref()),
            base_path: base_path.into(),
        }
    }

    /// Returns the document root.
    pub fn doc_root(&self) -> &Path {
        &self.doc_root
    }

    /// Returns the public base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Removes `.`, `..` and empty segments from a `/`-separated path.
    pub fn canonicalize_path(&self, path: &str) -> String {
        normalize_slashed(path)
    }

    /// Rewrites one url found in `css_file`.
    ///
    /// Absolute urls (`/x`, `scheme:x`, `#x`) and urls in files outside the
    /// document root are returned unchanged.
    pub fn absolutize_url(&self, url: &str, css_file: &Path) -> String {
        if url.is_empty() || absolute_pattern().is_match(url) {
            return url.to_string();
        }

        let css_file = absolutize(css_file);
        let Some(relative_dir) = css_file
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.doc_root).ok())
        else {
            return url.to_string();
        };

        let relative_dir: Vec<String> = relative_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let joined = format!(
            "{}/{}/{}",
            self.base_path.trim_end_matches('/'),
            relative_dir.join("/"),
            url
        );
        let canonical = self.canonicalize_path(&joined);
        if canonical.starts_with('/') {
            canonical
        } else {
            format!("/{canonical}")
        }
    }

    /// Rewrites every `url(...)` in `code`.
    pub fn apply(&self, code: &str, css_file: &Path) -> String {
        url_pattern()
            .replace_all(code, |caps: &Captures<'_>| {
                let url = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map_or("", |m| m.as_str());
                let rewritten = self.absolutize_url(url, css_file).replace('\'', "\\'");
                format!("url('{rewritten}')")
            })
            .into_owned()
    }
}

impl FileFilter for CssUrlsFilter {
    fn apply(
        &self,
        content: String,
        _compiler: &Compiler,
        file: &Path,
    ) -> Result<String, FilterError> {
        Ok(CssUrlsFilter::apply(self, &content, file))
    }
}
