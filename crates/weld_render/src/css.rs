//! `<link>` and `<style>` output.

use crate::html::Element;
use crate::loader::Loader;
use crate::renderer::Renderer;

/// Renders stylesheet bundles.
#[derive(Debug)]
pub struct CssRenderer {
    loader: Loader,
    media: Option<String>,
    title: Option<String>,
    content_type: String,
    alternate: bool,
}

impl CssRenderer {
    /// Creates a renderer with `type="text/css"` and no media or title.
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            media: None,
            title: None,
            content_type: "text/css".to_string(),
            alternate: false,
        }
    }

    /// Returns the loader for reconfiguration.
    pub fn loader_mut(&mut self) -> &mut Loader {
        &mut self.loader
    }

    /// Returns the `media` attribute.
    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    /// Sets the `media` attribute.
    pub fn set_media(&mut self, media: Option<String>) -> &mut Self {
        self.media = media;
        self
    }

    /// Returns the `title` attribute.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Sets the `title` attribute.
    pub fn set_title(&mut self, title: Option<String>) -> &mut Self {
        self.title = title;
        self
    }

    /// Returns the `type` attribute.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the `type` attribute.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns `true` for an alternate stylesheet.
    pub fn is_alternate(&self) -> bool {
        self.alternate
    }

    /// Marks the stylesheet as `rel="stylesheet alternate"`.
    pub fn set_alternate(&mut self, alternate: bool) -> &mut Self {
        self.alternate = alternate;
        self
    }
}

impl Renderer for CssRenderer {
    fn loader(&self) -> &Loader {
        &self.loader
    }

    fn remote_element(&self, url: &str) -> String {
        let rel = if self.alternate {
            "stylesheet alternate"
        } else {
            "stylesheet"
        };
        Element::new("link")
            .attr("rel", rel)
            .attr("type", self.content_type.as_str())
            .opt_attr("media", self.media.as_deref())
            .opt_attr("title", self.title.as_deref())
            .opt_attr("nonce", self.loader.compiler().nonce())
            .attr("href", url)
            .open()
    }

    fn inline_body(&self, body: &str) -> String {
        Element::new("style")
            .attr("type", self.content_type.as_str())
            .opt_attr("media", self.media.as_deref())
            .opt_attr("nonce", self.loader.compiler().nonce())
            .wrap(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weld_core::{Compiler, FileCollection};

    fn setup() -> (tempfile::TempDir, CssRenderer) {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("webtemp");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(dir.path().join("a.css"), "a{}").unwrap();
        std::fs::write(dir.path().join("b.css"), "b{}").unwrap();

        let mut collection = FileCollection::new(dir.path());
        collection.add_files(["a.css", "b.css"]).unwrap();
        let compiler = Compiler::css(collection, &out).unwrap();
        (dir, CssRenderer::new(Loader::new(compiler, "/webtemp")))
    }

    #[test]
    fn element() {
        let (_dir, mut renderer) = setup();
        renderer.set_media(Some("screen".to_string()));
        let artifact = renderer.loader().compiler().generate().unwrap().unwrap();

        let expected = format!(
            r#"<link rel="stylesheet" type="text/css" media="screen" href="/webtemp/{}?{}">"#,
            artifact.file(),
            artifact.timestamp()
        );
        assert_eq!(renderer.element(&artifact), expected);
    }

    #[test]
    fn alternate_with_title_and_nonce() {
        let (_dir, mut renderer) = setup();
        renderer
            .set_alternate(true)
            .set_title(Some("High \"contrast\"".to_string()));
        renderer
            .loader_mut()
            .compiler_mut()
            .set_nonce(Some("r4nd".to_string()));

        let html = renderer.remote_element("/x.css");
        assert_eq!(
            html,
            r#"<link rel="stylesheet alternate" type="text/css" title="High &quot;contrast&quot;" nonce="r4nd" href="/x.css">"#
        );
    }

    #[test]
    fn inline_element() {
        let (_dir, renderer) = setup();
        let artifact = renderer.loader().compiler().generate().unwrap().unwrap();
        assert_eq!(
            renderer.inline_element(&artifact).unwrap(),
            "<style type=\"text/css\">\na{}\nb{}</style>"
        );
    }

    #[test]
    fn render_lists_remote_files_first() {
        let (_dir, mut renderer) = setup();
        renderer.loader_mut().set_append_last_modified(false);
        renderer
            .loader_mut()
            .compiler_mut()
            .collection_mut()
            .add_remote_file("https://cdn.test/reset.css");

        let html = renderer.render().unwrap();
        let lines: Vec<&str> = html.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"<link rel="stylesheet" type="text/css" href="https://cdn.test/reset.css">"#
        );
        assert!(lines[1].starts_with(r#"<link rel="stylesheet" type="text/css" href="/webtemp/"#));
        assert!(lines[1].ends_with(r#".css">"#));
    }

    #[test]
    fn render_empty_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::css(FileCollection::new(dir.path()), dir.path()).unwrap();
        let renderer = CssRenderer::new(Loader::new(compiler, "/webtemp"));
        assert_eq!(renderer.render().unwrap(), "");
    }
}
