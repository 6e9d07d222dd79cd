//! `<script>` output.

use crate::html::Element;
use crate::loader::Loader;
use crate::renderer::Renderer;

/// Renders script bundles, honouring the compiler's `async`, `defer` and
/// `nonce` hints.
#[derive(Debug)]
pub struct JsRenderer {
    loader: Loader,
}

impl JsRenderer {
    /// Creates a script renderer.
    pub fn new(loader: Loader) -> Self {
        Self { loader }
    }

    /// Returns the loader for reconfiguration.
    pub fn loader_mut(&mut self) -> &mut Loader {
        &mut self.loader
    }
}

impl Renderer for JsRenderer {
    fn loader(&self) -> &Loader {
        &self.loader
    }

    fn remote_element(&self, url: &str) -> String {
        let compiler = self.loader.compiler();
        Element::new("script")
            .flag("async", compiler.is_async())
            .flag("defer", compiler.is_defer())
            .opt_attr("nonce", compiler.nonce())
            .attr("src", url)
            .wrap("")
    }

    fn inline_body(&self, body: &str) -> String {
        Element::new("script")
            .opt_attr("nonce", self.loader.compiler().nonce())
            .wrap(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weld_core::{Compiler, FileCollection};

    fn setup() -> (tempfile::TempDir, JsRenderer) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "var a = 1;").unwrap();
        let mut collection = FileCollection::new(dir.path());
        collection.add_file("app.js").unwrap();
        let compiler = Compiler::js(collection, dir.path()).unwrap();
        let mut loader = Loader::new(compiler, "/js");
        loader.set_append_last_modified(false);
        (dir, JsRenderer::new(loader))
    }

    #[test]
    fn plain_script() {
        let (_dir, renderer) = setup();
        assert_eq!(
            renderer.remote_element("/js/app.js"),
            r#"<script src="/js/app.js"></script>"#
        );
    }

    #[test]
    fn async_defer_nonce() {
        let (_dir, mut renderer) = setup();
        renderer
            .loader_mut()
            .compiler_mut()
            .set_async(true)
            .set_defer(true)
            .set_nonce(Some("n<1>".to_string()));
        assert_eq!(
            renderer.remote_element("/js/app.js"),
            r#"<script async defer nonce="n&lt;1&gt;" src="/js/app.js"></script>"#
        );
    }

    #[test]
    fn element_and_inline() {
        let (_dir, renderer) = setup();
        let artifact = renderer.loader().compiler().generate().unwrap().unwrap();
        assert!(artifact.file().ends_with(".js"));
        assert_eq!(
            renderer.element(&artifact),
            format!(r#"<script src="/js/{}"></script>"#, artifact.file())
        );
        assert_eq!(
            renderer.inline_element(&artifact).unwrap(),
            "<script>\nvar a = 1;</script>"
        );
    }
}
