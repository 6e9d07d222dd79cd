//! Compiler construction from resolved bundles.

use std::path::{Path, PathBuf};

use weld_core::{Compiler, DefaultOutputNamingConvention, FileCollection};
use weld_filters::{
    CssMinFilter, CssUrlsFilter, JsMinFilter, ProcessFilter, TypeScriptFilter, VariablesFilter,
};

use crate::error::ConfigError;
use crate::finder::find_files;
use crate::resolve::{resolve_bundle, ResolvedBundle};
use crate::types::{BundleKind, FileEntry, WeldConfig};

/// A configured compiler with the bundle it was built from.
#[derive(Debug)]
pub struct NamedCompiler {
    /// The bundle name.
    pub name: String,
    /// The bundle kind.
    pub kind: BundleKind,
    /// URL path of the output directory.
    pub public_path: String,
    /// The compiler.
    pub compiler: Compiler,
}

/// Builds a compiler for every configured bundle, stylesheets first, each
/// kind in name order.
pub fn build_compilers(
    config: &WeldConfig,
    project_dir: &Path,
) -> Result<Vec<NamedCompiler>, ConfigError> {
    let mut compilers = Vec::new();
    for kind in BundleKind::ALL {
        for name in config.bundles(kind).keys() {
            let bundle = resolve_bundle(config, kind, name)?;
            compilers.push(build_compiler(config, &bundle, project_dir)?);
        }
    }
    Ok(compilers)
}

/// Builds the compiler for one resolved bundle.
///
/// Relative directories are taken from `project_dir`. Missing source files
/// and an unusable output directory are reported here, before anything is
/// generated.
pub fn build_compiler(
    config: &WeldConfig,
    bundle: &ResolvedBundle,
    project_dir: &Path,
) -> Result<NamedCompiler, ConfigError> {
    let source_dir = project_dir.join(&bundle.source_dir);
    let output_dir = project_dir.join(&bundle.output_dir);

    let mut collection = FileCollection::new(&source_dir);
    for entry in &bundle.files {
        collection.add_files(expand_entry(entry, &source_dir, project_dir)?)?;
    }
    for entry in &bundle.watch_files {
        collection.add_watch_files(expand_entry(entry, &source_dir, project_dir)?)?;
    }
    collection.add_remote_files(bundle.remote_files.iter().cloned());

    let mut naming = match bundle.kind {
        BundleKind::Css => DefaultOutputNamingConvention::css(),
        BundleKind::Js => DefaultOutputNamingConvention::js(),
    };
    naming.set_prefix(bundle.naming_prefix.as_str());

    let mut compiler = Compiler::new(collection, naming, &output_dir)?;
    compiler.set_check_last_modified(bundle.check_last_modified);
    compiler.enable_debugging(bundle.debug);
    compiler
        .set_async(bundle.is_async)
        .set_defer(bundle.defer)
        .set_nonce(bundle.nonce.clone())
        .set_absolute_url(bundle.absolute_url);

    for name in &bundle.file_filters {
        add_file_filter(&mut compiler, config, bundle, project_dir, name)?;
    }
    for name in &bundle.filters {
        add_filter(&mut compiler, config, bundle, name)?;
    }

    tracing::debug!(
        bundle = %bundle.name,
        kind = %bundle.kind,
        files = compiler.collection().files().len(),
        file_filters = compiler.file_filter_count(),
        filters = compiler.filter_count(),
        "configured compiler"
    );

    Ok(NamedCompiler {
        name: bundle.name.clone(),
        kind: bundle.kind,
        public_path: bundle.public_path.clone(),
        compiler,
    })
}

/// Turns one file entry into paths the collection can register.
///
/// A literal path is looked up in the source directory first and falls back
/// to the project directory. Finder directories resolve the same way.
fn expand_entry(
    entry: &FileEntry,
    source_dir: &Path,
    project_dir: &Path,
) -> Result<Vec<PathBuf>, ConfigError> {
    let locate = |path: &str| {
        let under_source = source_dir.join(path);
        if under_source.exists() {
            under_source
        } else {
            project_dir.join(path)
        }
    };

    match entry {
        FileEntry::Path(path) => Ok(vec![locate(path)]),
        FileEntry::Finder(spec) => match (&spec.in_dir, &spec.from) {
            (Some(dir), None) => find_files(&locate(dir), &spec.extension, false),
            (None, Some(dir)) => find_files(&locate(dir), &spec.extension, true),
            _ => Err(ConfigError::MissingField(
                "exactly one of 'in' or 'from' in file finder".to_string(),
            )),
        },
    }
}

fn add_file_filter(
    compiler: &mut Compiler,
    config: &WeldConfig,
    bundle: &ResolvedBundle,
    project_dir: &Path,
    name: &str,
) -> Result<(), ConfigError> {
    let tools = &config.tools;
    match name {
        "variables" => compiler.add_file_filter(VariablesFilter::new(config.variables.clone())),
        "css-urls" => compiler.add_file_filter(CssUrlsFilter::new(
            project_dir.join(&bundle.doc_root),
            bundle.base_path.as_str(),
        )),
        "less" => compiler.add_file_filter(ProcessFilter::less(tools.lessc.as_str())),
        "sass" => compiler.add_file_filter(ProcessFilter::sass(tools.sass.as_str())),
        "stylus" => compiler.add_file_filter(ProcessFilter::stylus(
            tools.stylus.as_str(),
            tools.stylus_compress,
            tools.stylus_include_css,
        )),
        "coffee" => {
            compiler.add_file_filter(ProcessFilter::coffee(tools.coffee.as_str(), tools.coffee_bare))
        }
        "typescript" => compiler.add_file_filter(TypeScriptFilter::new(tools.tsc.as_str())),
        "cssmin" => compiler.add_file_filter(CssMinFilter::new()),
        "jsmin" => compiler.add_file_filter(JsMinFilter::new()),
        _ => {
            return Err(ConfigError::UnknownFilter {
                bundle: bundle.name.clone(),
                name: name.to_string(),
            })
        }
    }
    Ok(())
}

fn add_filter(
    compiler: &mut Compiler,
    config: &WeldConfig,
    bundle: &ResolvedBundle,
    name: &str,
) -> Result<(), ConfigError> {
    match name {
        "variables" => compiler.add_filter(VariablesFilter::new(config.variables.clone())),
        "cssmin" => compiler.add_filter(CssMinFilter::new()),
        "jsmin" => compiler.add_filter(JsMinFilter::new()),
        _ => {
            return Err(ConfigError::UnknownFilter {
                bundle: bundle.name.clone(),
                name: name.to_string(),
            })
        }
    }
    Ok(())
}
