//! HTML tag rendering for generated bundles.
//!
//! A [`Loader`] wraps a [`Compiler`](weld_core::Compiler) together with the
//! public path its output directory is served under. [`CssRenderer`] and
//! [`JsRenderer`] turn the compiler's artifacts into `<link>`, `<style>` and
//! `<script>` elements through the shared [`Renderer`] trait.

#![warn(missing_docs)]

pub mod css;
pub mod html;
pub mod js;
pub mod loader;
pub mod renderer;

pub use css::CssRenderer;
pub use js::JsRenderer;
pub use loader::Loader;
pub use renderer::Renderer;
