//! Error types for registration, filtering, and artifact generation.

use std::path::PathBuf;

/// Errors raised by the compiler, the file registry, and output directory
/// validation.
///
/// Configuration problems surface when a value is set, never later at write
/// time. Filter and I/O failures abort the `generate` call that hit them and
/// leave any existing artifact untouched.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The output directory does not exist.
    #[error("output directory '{path}' does not exist")]
    OutputDirNotFound {
        /// The configured output directory.
        path: PathBuf,
    },

    /// The output path exists but is not a directory.
    #[error("output path '{path}' is not a directory")]
    OutputDirNotADirectory {
        /// The configured output path.
        path: PathBuf,
    },

    /// A probe file could not be created in the output directory.
    #[error("output directory '{path}' is not writable: {source}")]
    OutputDirNotWritable {
        /// The configured output directory.
        path: PathBuf,
        /// The error from the write probe.
        source: std::io::Error,
    },

    /// A source or watch file could not be found.
    #[error("neither '{path}' nor '{root_relative}' was found")]
    FileNotFound {
        /// The path as given by the caller.
        path: PathBuf,
        /// The path joined to the collection root.
        root_relative: PathBuf,
    },

    /// A source file is not valid UTF-8.
    #[error("'{path}' is not valid UTF-8; filters only accept UTF-8 sources")]
    NotUtf8 {
        /// The offending source file.
        path: PathBuf,
    },

    /// A filter failed while producing bundle content.
    #[error("{}", describe_filter_failure(.file.as_ref(), .source))]
    Filter {
        /// The source file being filtered, `None` for bundle filters.
        file: Option<PathBuf>,
        /// The underlying filter error.
        source: FilterError,
    },

    /// An I/O error occurred while reading sources or writing the artifact.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn describe_filter_failure(file: Option<&PathBuf>, source: &FilterError) -> String {
    match file {
        Some(file) => format!("filter failed on {}: {source}", file.display()),
        None => format!("bundle filter failed: {source}"),
    }
}

/// Errors returned by individual filters.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// An external program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The spawn error.
        source: std::io::Error,
    },

    /// An external program exited with a non-zero status.
    #[error("'{program}' exited with status {code}: {stderr}")]
    Process {
        /// The program that was invoked.
        program: String,
        /// The exit code, `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// A substitution variable was looked up but never set.
    #[error("variable '{name}' is not set")]
    VariableNotSet {
        /// The variable name.
        name: String,
    },

    /// A filter failed to read or write an auxiliary file.
    #[error("filter I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Any other filter failure.
    #[error("{message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl FilterError {
    /// Creates a generic filter failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
