//! Configuration types deserialized from `weld.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The top-level configuration parsed from `weld.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct WeldConfig {
    /// Per-kind defaults merged under every bundle.
    #[serde(default)]
    pub defaults: Defaults,
    /// Stylesheet bundles by name.
    #[serde(default)]
    pub css: BTreeMap<String, BundleConfig>,
    /// Script bundles by name.
    #[serde(default)]
    pub js: BTreeMap<String, BundleConfig>,
    /// Values for the `variables` filter.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// External compiler binaries used by the process filters.
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl WeldConfig {
    /// Returns the bundles of one kind.
    pub fn bundles(&self, kind: BundleKind) -> &BTreeMap<String, BundleConfig> {
        match kind {
            BundleKind::Css => &self.css,
            BundleKind::Js => &self.js,
        }
    }

    /// Returns the defaults of one kind.
    pub fn defaults_for(&self, kind: BundleKind) -> &KindDefaults {
        match kind {
            BundleKind::Css => &self.defaults.css,
            BundleKind::Js => &self.defaults.js,
        }
    }

    /// Finds the kind of a bundle by name.
    pub fn kind_of(&self, name: &str) -> Option<BundleKind> {
        BundleKind::ALL
            .into_iter()
            .find(|kind| self.bundles(*kind).contains_key(name))
    }
}

/// The two bundle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BundleKind {
    /// Stylesheets, named `<hash>.css`.
    Css,
    /// Scripts, named `<hash>.js`.
    Js,
}

impl BundleKind {
    /// Both kinds, stylesheets first.
    pub const ALL: [BundleKind; 2] = [BundleKind::Css, BundleKind::Js];

    /// Returns the config table name, also used as the file suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            BundleKind::Css => "css",
            BundleKind::Js => "js",
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundleKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(BundleKind::Css),
            "js" => Ok(BundleKind::Js),
            _ => Err(ConfigError::UnknownKind(s.to_string())),
        }
    }
}

/// The `[defaults]` table.
#[derive(Debug, Default, Deserialize)]
pub struct Defaults {
    /// Defaults for `[css.*]` bundles.
    #[serde(default)]
    pub css: KindDefaults,
    /// Defaults for `[js.*]` bundles.
    #[serde(default)]
    pub js: KindDefaults,
}

/// Settings shared by all bundles of one kind.
///
/// Every field is optional; unset fields fall back to built-in values.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct KindDefaults {
    /// Directory that relative file entries are resolved against.
    pub source_dir: Option<String>,
    /// Directory generated bundles are written to.
    pub output_dir: Option<String>,
    /// URL path the output directory is served under.
    pub public_path: Option<String>,
    /// Document root used by the `css-urls` filter.
    pub doc_root: Option<String>,
    /// URL path the document root is served under.
    pub base_path: Option<String>,
    /// Whether to compare mtimes before regenerating.
    pub check_last_modified: Option<bool>,
    /// Whether to regenerate on every call.
    pub debug: Option<bool>,
}

/// One `[css.<name>]` or `[js.<name>]` table.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BundleConfig {
    /// Source files, in concatenation order.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Extra files whose changes invalidate the bundle.
    #[serde(default)]
    pub watch_files: Vec<FileEntry>,
    /// URLs rendered before the bundle, never fetched.
    #[serde(default)]
    pub remote_files: Vec<String>,
    /// Per-file filter names, in order.
    #[serde(default)]
    pub file_filters: Vec<String>,
    /// Bundle filter names, in order.
    #[serde(default)]
    pub filters: Vec<String>,
    /// Prefix of the generated filename.
    #[serde(default)]
    pub naming_prefix: Option<String>,
    /// Overrides the kind's source directory.
    #[serde(default)]
    pub source_dir: Option<String>,
    /// Overrides the kind's output directory.
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Overrides the kind's public path.
    #[serde(default)]
    pub public_path: Option<String>,
    /// Overrides the kind's document root.
    #[serde(default)]
    pub doc_root: Option<String>,
    /// Overrides the kind's base path.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Overrides the kind's mtime check setting.
    #[serde(default)]
    pub check_last_modified: Option<bool>,
    /// Overrides the kind's debug setting.
    #[serde(default)]
    pub debug: Option<bool>,
    /// Render the script tag with `async`.
    #[serde(default, rename = "async")]
    pub is_async: bool,
    /// Render the script tag with `defer`.
    #[serde(default)]
    pub defer: bool,
    /// CSP nonce added to rendered tags.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Anchor relative public urls at `/`.
    #[serde(default)]
    pub absolute_url: bool,
}

/// A file entry: a literal path or a directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    /// A single file, relative to the source directory or the project.
    Path(String),
    /// All files with an extension in a directory.
    Finder(FinderSpec),
}

/// A directory scan: `{ in = "dir", extension = "css" }` lists one directory,
/// `{ from = "dir", extension = "css" }` descends into subdirectories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinderSpec {
    /// Directory to list, non-recursively.
    #[serde(default, rename = "in")]
    pub in_dir: Option<String>,
    /// Directory to walk recursively.
    #[serde(default)]
    pub from: Option<String>,
    /// File extension to match, without the dot.
    pub extension: String,
}

/// The `[tools]` table: external compiler binaries and their switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// The LESS compiler.
    pub lessc: String,
    /// The Sass compiler.
    pub sass: String,
    /// The Stylus compiler.
    pub stylus: String,
    /// Pass `-c` to Stylus.
    pub stylus_compress: bool,
    /// Pass `--include-css` to Stylus.
    pub stylus_include_css: bool,
    /// The CoffeeScript compiler.
    pub coffee: String,
    /// Pass `-b` to CoffeeScript.
    pub coffee_bare: bool,
    /// The TypeScript compiler.
    pub tsc: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            lessc: "lessc".to_string(),
            sass: "sass".to_string(),
            stylus: "stylus".to_string(),
            stylus_compress: false,
            stylus_include_css: false,
            coffee: "coffee".to_string(),
            coffee_bare: false,
            tsc: "tsc".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_str() {
        assert_eq!("css".parse::<BundleKind>().unwrap(), BundleKind::Css);
        assert_eq!("JS".parse::<BundleKind>().unwrap(), BundleKind::Js);
        assert!(matches!(
            "html".parse::<BundleKind>(),
            Err(ConfigError::UnknownKind(_))
        ));
        assert_eq!(BundleKind::Js.to_string(), "js");
    }

    #[test]
    fn file_entries_untagged() {
        let bundle: BundleConfig = toml::from_str(
            r#"
files = ["reset.css", { in = "components", extension = "css" }, { from = "vendor", extension = "css" }]
"#,
        )
        .unwrap();
        assert_eq!(bundle.files[0], FileEntry::Path("reset.css".to_string()));
        assert_eq!(
            bundle.files[1],
            FileEntry::Finder(FinderSpec {
                in_dir: Some("components".to_string()),
                from: None,
                extension: "css".to_string(),
            })
        );
        assert!(
            matches!(&bundle.files[2], FileEntry::Finder(spec) if spec.from.as_deref() == Some("vendor"))
        );
    }

    #[test]
    fn async_is_renamed() {
        let bundle: BundleConfig = toml::from_str("async = true\ndefer = true").unwrap();
        assert!(bundle.is_async);
        assert!(bundle.defer);
        assert!(!bundle.absolute_url);
    }

    #[test]
    fn tools_defaults() {
        let tools: ToolsConfig = toml::from_str(r#"lessc = "/opt/bin/lessc""#).unwrap();
        assert_eq!(tools.lessc, "/opt/bin/lessc");
        assert_eq!(tools.tsc, "tsc");
        assert!(!tools.coffee_bare);
    }

    #[test]
    fn kind_of() {
        let config: WeldConfig = toml::from_str(
            r#"
[css.screen]
files = ["a.css"]

[js.app]
files = ["a.js"]
"#,
        )
        .unwrap();
        assert_eq!(config.kind_of("screen"), Some(BundleKind::Css));
        assert_eq!(config.kind_of("app"), Some(BundleKind::Js));
        assert_eq!(config.kind_of("print"), None);
    }
}
