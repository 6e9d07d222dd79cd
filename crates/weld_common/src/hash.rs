//! Content hashing for output naming and cache keys.

use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// Output artifacts are named after the hash of their inputs, so two bundles
/// with the same `ContentHash` share one file in the output directory.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_be_bytes())
    }

    /// Computes a content hash over several parts joined with `separator`.
    ///
    /// Equivalent to hashing `parts.join(separator)` without building the
    /// joined string.
    pub fn from_parts<I, S>(parts: I, separator: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = xxhash_rust::xxh3::Xxh3::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                hasher.update(separator.as_bytes());
            }
            hasher.update(part.as_ref().as_bytes());
        }
        Self(hasher.digest128().to_be_bytes())
    }

    /// Returns the first `len` lowercase hex characters of the hash.
    ///
    /// `len` is clamped to the full 32-character width.
    pub fn short(&self, len: usize) -> String {
        let mut hex = self.to_string();
        hex.truncate(len.min(32));
        hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
