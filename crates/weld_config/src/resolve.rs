//! Bundle resolution: merging per-kind defaults into a bundle.

use crate::error::ConfigError;
use crate::types::{BundleKind, FileEntry, WeldConfig};

/// A bundle with every setting decided.
///
/// Bundle values win over `[defaults.<kind>]`, which win over the built-in
/// defaults. Paths are still relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBundle {
    /// The bundle name.
    pub name: String,
    /// The bundle kind.
    pub kind: BundleKind,
    /// Directory relative file entries are looked up in.
    pub source_dir: String,
    /// Directory the bundle is written to.
    pub output_dir: String,
    /// URL path of the output directory.
    pub public_path: String,
    /// Document root for the `css-urls` filter.
    pub doc_root: String,
    /// URL path of the document root.
    pub base_path: String,
    /// Source file entries.
    pub files: Vec<FileEntry>,
    /// Watch file entries.
    pub watch_files: Vec<FileEntry>,
    /// Remote URLs.
    pub remote_files: Vec<String>,
    /// Per-file filter names.
    pub file_filters: Vec<String>,
    /// Bundle filter names.
    pub filters: Vec<String>,
    /// Prefix of the generated filename.
    pub naming_prefix: String,
    /// Compare mtimes before regenerating.
    pub check_last_modified: bool,
    /// Regenerate on every call.
    pub debug: bool,
    /// `async` script hint.
    pub is_async: bool,
    /// `defer` script hint.
    pub defer: bool,
    /// CSP nonce.
    pub nonce: Option<String>,
    /// Anchor relative urls at `/`.
    pub absolute_url: bool,
}

fn default_source_dir(kind: BundleKind) -> &'static str {
    match kind {
        BundleKind::Css => "www/css",
        BundleKind::Js => "www/js",
    }
}

const DEFAULT_OUTPUT_DIR: &str = "www/webtemp";
const DEFAULT_PUBLIC_PATH: &str = "webtemp";
const DEFAULT_DOC_ROOT: &str = "www";
const DEFAULT_BASE_PATH: &str = "/";

/// Resolves a named bundle of the given kind.
pub fn resolve_bundle(
    config: &WeldConfig,
    kind: BundleKind,
    name: &str,
) -> Result<ResolvedBundle, ConfigError> {
    let bundle = config
        .bundles(kind)
        .get(name)
        .ok_or_else(|| ConfigError::UnknownBundle {
            kind: kind.to_string(),
            name: name.to_string(),
        })?;
    let defaults = config.defaults_for(kind);

    let pick = |own: &Option<String>, shared: &Option<String>, builtin: &str| {
        own.clone()
            .or_else(|| shared.clone())
            .unwrap_or_else(|| builtin.to_string())
    };

    Ok(ResolvedBundle {
        name: name.to_string(),
        kind,
        source_dir: pick(
            &bundle.source_dir,
            &defaults.source_dir,
            default_source_dir(kind),
        ),
        output_dir: pick(&bundle.output_dir, &defaults.output_dir, DEFAULT_OUTPUT_DIR),
        public_path: pick(
            &bundle.public_path,
            &defaults.public_path,
            DEFAULT_PUBLIC_PATH,
        ),
        doc_root: pick(&bundle.doc_root, &defaults.doc_root, DEFAULT_DOC_ROOT),
        base_path: pick(&bundle.base_path, &defaults.base_path, DEFAULT_BASE_PATH),
        files: bundle.files.clone(),
        watch_files: bundle.watch_files.clone(),
        remote_files: bundle.remote_files.clone(),
        file_filters: bundle.file_filters.clone(),
        filters: bundle.filters.clone(),
        naming_prefix: bundle.naming_prefix.clone().unwrap_or_default(),
        check_last_modified: bundle
            .check_last_modified
            .or(defaults.check_last_modified)
            .unwrap_or(true),
        debug: bundle.debug.or(defaults.debug).unwrap_or(false),
        is_async: bundle.is_async,
        defer: bundle.defer,
        nonce: bundle.nonce.clone(),
        absolute_url: bundle.absolute_url,
    })
}
