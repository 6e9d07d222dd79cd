//! Compiler plus public path.

use weld_core::{Artifact, Compiler};

/// Shared state of every renderer: the compiler and where its output
/// directory is served from.
#[derive(Debug)]
pub struct Loader {
    compiler: Compiler,
    public_path: String,
    append_last_modified: bool,
}

impl Loader {
    /// Creates a loader serving `compiler`'s output under `public_path`.
    pub fn new(compiler: Compiler, public_path: impl Into<String>) -> Self {
        Self {
            compiler,
            public_path: public_path.into(),
            append_last_modified: true,
        }
    }

    /// Returns the compiler.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Returns the compiler for reconfiguration.
    pub fn compiler_mut(&mut self) -> &mut Compiler {
        &mut self.compiler
    }

    /// Consumes the loader, returning the compiler.
    pub fn into_compiler(self) -> Compiler {
        self.compiler
    }

    /// Returns the public path.
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Sets the public path.
    pub fn set_public_path(&mut self, public_path: impl Into<String>) {
        self.public_path = public_path.into();
    }

    /// Returns `true` if urls carry a `?<mtime>` cache-buster.
    pub fn append_last_modified(&self) -> bool {
        self.append_last_modified
    }

    /// Enables or disables the `?<mtime>` cache-buster.
    pub fn set_append_last_modified(&mut self, append: bool) {
        self.append_last_modified = append;
    }

    /// Returns the public url of `artifact`.
    ///
    /// With the compiler's absolute-url hint set, a relative public path is
    /// anchored at `/`.
    pub fn url(&self, artifact: &Artifact) -> String {
        let base = self.public_path.trim_end_matches('/');
        let mut url = if base.is_empty() {
            artifact.file().to_string()
        } else {
            format!("{base}/{}", artifact.file())
        };
        if self.compiler.is_absolute_url() && !is_absolute(&url) {
            url.insert(0, '/');
        }
        if self.append_last_modified {
            url.push_str(&format!("?{}", artifact.timestamp()));
        }
        url
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with('/') || url.contains("://")
}
