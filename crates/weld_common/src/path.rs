//! Lexical path normalization.
//!
//! Paths are compared by their normalized spelling, so `a/./b`, `a//b` and
//! `a/c/../b` all identify the same file. Normalization never touches the
//! filesystem and never resolves symlinks.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path lexically.
///
/// Drops `.` segments, collapses repeated separators, and resolves `..`
/// against the preceding normal segment. A `..` that would climb above the
/// root of an absolute path is dropped; leading `..` segments of a relative
/// path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Makes a path absolute against the current working directory and
/// normalizes it.
///
/// Falls back to normalizing the path as given when the working directory
/// cannot be determined.
pub fn absolutize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    normalize(&absolute)
}

/// Normalizes a `/`-separated path string such as a URL path.
///
/// Backslashes are treated as separators. Empty and `.` segments are
/// dropped, `..` removes the previous segment. A leading `/` is preserved.
pub fn normalize_slashed(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for piece in unified.split('/') {
        match piece {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if unified.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}
