//! Output file naming.
//!
//! The artifact name is derived from the source paths and their modification
//! times, so editing any source yields a new name and browsers never see a
//! stale cached bundle.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use weld_common::ContentHash;

use crate::compiler::Compiler;

/// Number of hex characters of the hash kept in generated names.
const HASH_LEN: usize = 12;

/// Separator placed between hashed name parts.
const PART_SEPARATOR: &str = "|";

/// Chooses the output filename of a bundle.
///
/// Implemented for any `Fn(&[PathBuf], &Compiler) -> String`, so a closure
/// can stand in for [`DefaultOutputNamingConvention`].
pub trait OutputNamingConvention: Send + Sync {
    /// Returns the filename (no directory) for the given source files.
    fn filename(&self, files: &[PathBuf], compiler: &Compiler) -> String;
}

impl<F> OutputNamingConvention for F
where
    F: Fn(&[PathBuf], &Compiler) -> String + Send + Sync,
{
    fn filename(&self, files: &[PathBuf], compiler: &Compiler) -> String {
        self(files, compiler)
    }
}

/// Names bundles `<prefix><12 hex chars><suffix>`.
///
/// The hash covers every path followed by every modification time, in
/// order. Files whose mtime cannot be read contribute an empty part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultOutputNamingConvention {
    prefix: String,
    suffix: String,
}

impl DefaultOutputNamingConvention {
    /// Creates a convention with no prefix or suffix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a convention producing `.css` files.
    pub fn css() -> Self {
        Self {
            suffix: ".css".to_string(),
            ..Self::default()
        }
    }

    /// Creates a convention producing `.js` files.
    pub fn js() -> Self {
        Self {
            suffix: ".js".to_string(),
            ..Self::default()
        }
    }

    /// Returns the filename prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sets the filename prefix.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Returns the filename suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Sets the filename suffix.
    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.suffix = suffix.into();
    }

    /// Hashes the paths and their mtimes into a short hex digest.
    pub fn hash(&self, files: &[PathBuf]) -> String {
        let paths = files.iter().map(|f| f.to_string_lossy().into_owned());
        let mtimes = files.iter().map(|f| mtime_part(f));
        ContentHash::from_parts(paths.chain(mtimes), PART_SEPARATOR).short(HASH_LEN)
    }
}

impl OutputNamingConvention for DefaultOutputNamingConvention {
    fn filename(&self, files: &[PathBuf], _compiler: &Compiler) -> String {
        format!("{}{}{}", self.prefix, self.hash(files), self.suffix)
    }
}

fn mtime_part(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::FileCollection;
    use std::time::{Duration, SystemTime};

    fn setup() -> (tempfile::TempDir, Compiler, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let mut files = Vec::new();
        for (name, content) in [("a.txt", "abc"), ("b.txt", "def"), ("c.txt", "ghi")] {
            let path = dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            files.push(path);
        }
        let compiler = Compiler::new(
            FileCollection::new(dir.path()),
            DefaultOutputNamingConvention::new(),
            &out,
        )
        .unwrap();
        (dir, compiler, files)
    }

    fn is_hex12(name: &str) -> bool {
        name.len() == 12 && name.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn multiple_files() {
        let (_dir, compiler, files) = setup();
        let convention = DefaultOutputNamingConvention::new();

        let name = convention.filename(&files[..2], &compiler);
        assert!(is_hex12(&name), "unexpected name {name}");

        let name2 = convention.filename(&files, &compiler);
        assert_ne!(name, name2, "different file lists produced the same name");
    }

    #[test]
    fn one_file() {
        let (_dir, compiler, files) = setup();
        let name = DefaultOutputNamingConvention::new().filename(&files[..1], &compiler);
        assert!(is_hex12(&name));
    }

    #[test]
    fn deterministic() {
        let (_dir, compiler, files) = setup();
        let convention = DefaultOutputNamingConvention::new();
        assert_eq!(
            convention.filename(&files, &compiler),
            convention.filename(&files, &compiler)
        );
    }

    #[test]
    fn order_matters() {
        let (_dir, compiler, files) = setup();
        let convention = DefaultOutputNamingConvention::new();
        let reversed: Vec<_> = files.iter().rev().cloned().collect();
        assert_ne!(
            convention.filename(&files, &compiler),
            convention.filename(&reversed, &compiler)
        );
    }

    #[test]
    fn mtime_change_changes_name() {
        let (_dir, compiler, files) = setup();
        let convention = DefaultOutputNamingConvention::new();
        let before = convention.filename(&files, &compiler);

        let later = SystemTime::now() + Duration::from_secs(30);
        std::fs::File::options()
            .write(true)
            .open(&files[1])
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert_ne!(before, convention.filename(&files, &compiler));
    }

    #[test]
    fn missing_file_still_named() {
        let (dir, compiler, _files) = setup();
        let ghost = vec![dir.path().join("ghost.txt")];
        let name = DefaultOutputNamingConvention::new().filename(&ghost, &compiler);
        assert!(is_hex12(&name));
    }

    #[test]
    fn css_convention() {
        let (_dir, compiler, files) = setup();
        let name = DefaultOutputNamingConvention::css().filename(&files[..1], &compiler);
        let (hash, ext) = name.split_at(12);
        assert!(is_hex12(hash));
        assert_eq!(ext, ".css");
    }

    #[test]
    fn js_convention_with_prefix() {
        let (_dir, compiler, files) = setup();
        let mut convention = DefaultOutputNamingConvention::js();
        convention.set_prefix("app-");
        assert_eq!(convention.prefix(), "app-");
        assert_eq!(convention.suffix(), ".js");

        let name = convention.filename(&files, &compiler);
        assert!(name.starts_with("app-"));
        assert!(name.ends_with(".js"));
        assert!(is_hex12(&name["app-".len()..name.len() - 3]));
    }

    #[test]
    fn closure_convention() {
        let (_dir, compiler, files) = setup();
        let convention = |files: &[PathBuf], _: &Compiler| format!("bundle-{}", files.len());
        assert_eq!(convention.filename(&files, &compiler), "bundle-3");
    }
}
