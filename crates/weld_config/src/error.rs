//! Error types for configuration loading and compiler construction.

use weld_core::CompileError;

/// Errors that can occur when loading a `weld.toml` or building compilers
/// from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file or
    /// scanning a source directory.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A bundle names a filter that does not exist or is not usable in that
    /// position.
    #[error("bundle '{bundle}' uses unknown filter '{name}'")]
    UnknownFilter {
        /// The bundle name.
        bundle: String,
        /// The filter name as written.
        name: String,
    },

    /// A requested bundle is not configured.
    #[error("unknown {kind} bundle '{name}'")]
    UnknownBundle {
        /// The bundle kind, `css` or `js`.
        kind: String,
        /// The requested name.
        name: String,
    },

    /// The bundle kind is neither `css` nor `js`.
    #[error("unknown bundle kind '{0}', expected 'css' or 'js'")]
    UnknownKind(String),

    /// The same bundle name is used under both `[css]` and `[js]`.
    #[error("bundle name '{0}' is used by both a css and a js bundle")]
    DuplicateBundle(String),

    /// Constructing or configuring a compiler failed.
    #[error(transparent)]
    Compile(#[from] CompileError),
}
