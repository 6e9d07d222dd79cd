//! Directory scans for `{ in | from, extension }` file entries.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Lists files under `dir` with the given extension, in natural order.
///
/// With `recursive` set, subdirectories are descended into. Extensions are
/// compared case-insensitively.
pub fn find_files(dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>, ConfigError> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    walk_dir(dir, extension, recursive, &mut files)?;
    files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(files)
}

fn walk_dir(
    dir: &Path,
    extension: &str,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), ConfigError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed.
        if entry.file_type()?.is_dir() {
            if recursive {
                walk_dir(&path, extension, recursive, files)?;
            }
        } else if has_extension(&path, extension) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Compares strings so that digit runs order by numeric value:
/// `file2` sorts before `file10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a);
                let right = take_digits(&mut b);
                let ord = compare_numeric(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

/// Compares two digit strings by value, then by length so `01` follows `1`.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order() {
        let mut names = vec!["img12.png", "img10.png", "IMG2.png", "img2.png", "img1.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            ["IMG2.png", "img1.png", "img2.png", "img10.png", "img12.png"]
        );
    }

    #[test]
    fn leading_zeros() {
        assert_eq!(natural_cmp("a1", "a01"), Ordering::Less);
        assert_eq!(natural_cmp("a007", "a7"), Ordering::Greater);
        assert_eq!(natural_cmp("a10", "a10"), Ordering::Equal);
        assert_eq!(natural_cmp("a", "a1"), Ordering::Less);
    }

    #[test]
    fn finds_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        for name in ["b10.css", "b2.css", "a.CSS", "skip.js"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::write(nested.join("deep.css"), "").unwrap();

        let flat = find_files(dir.path(), "css", false).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.CSS", "b2.css", "b10.css"]);

        let deep = find_files(dir.path(), ".css", true).unwrap();
        assert_eq!(deep.len(), 4);
        assert!(deep.contains(&nested.join("deep.css")));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_is_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("a.css"), "").unwrap();
        std::os::unix::fs::symlink(dir.path(), nested.join("loop")).unwrap();

        let files = find_files(dir.path(), "css", true).unwrap();
        assert_eq!(files, [nested.join("a.css")]);
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_files(&dir.path().join("nope"), "css", false).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
