//! The renderer trait shared by stylesheet and script output.

use std::fs;

use weld_core::{Artifact, CompileError};

use crate::loader::Loader;

/// Turns artifacts of one compiler into HTML elements.
pub trait Renderer {
    /// Returns the loader holding the compiler and public path.
    fn loader(&self) -> &Loader;

    /// Renders an element referencing `url` directly.
    fn remote_element(&self, url: &str) -> String;

    /// Renders an element pulling `body` inline.
    fn inline_body(&self, body: &str) -> String;

    /// Returns the public url of `artifact`.
    fn url(&self, artifact: &Artifact) -> String {
        self.loader().url(artifact)
    }

    /// Renders an element referencing `artifact`.
    fn element(&self, artifact: &Artifact) -> String {
        self.remote_element(&self.url(artifact))
    }

    /// Renders an element embedding the artifact's content.
    fn inline_element(&self, artifact: &Artifact) -> Result<String, CompileError> {
        let body = fs::read_to_string(artifact.path()).map_err(|source| CompileError::Io {
            path: artifact.path().to_path_buf(),
            source,
        })?;
        Ok(self.inline_body(&body))
    }

    /// Generates the bundle and renders one element per remote file followed
    /// by the element of the generated artifact, one per line.
    fn render(&self) -> Result<String, CompileError> {
        let compiler = self.loader().compiler();
        let mut elements: Vec<String> = compiler
            .collection()
            .remote_files()
            .iter()
            .map(|url| self.remote_element(url))
            .collect();

        if let Some(artifact) = compiler.generate()? {
            elements.push(self.element(&artifact));
        }
        tracing::debug!(elements = elements.len(), "rendered bundle");
        Ok(elements.join("\n"))
    }
}
