//! Stock filters for weld compilers.
//!
//! - [`VariablesFilter`] substitutes `{{$name}}` placeholders.
//! - [`CssUrlsFilter`] rewrites relative `url(...)` references in stylesheets.
//! - [`ProcessFilter`] and [`TypeScriptFilter`] hand matching source files to
//!   an external compiler such as `lessc`, `sass`, `stylus`, `coffee` or `tsc`.
//! - [`CssMinFilter`] and [`JsMinFilter`] minify stylesheets and scripts.

#![warn(missing_docs)]

pub mod css_urls;
pub mod minify;
pub mod process;
pub mod variables;

pub use css_urls::CssUrlsFilter;
pub use minify::{CssMinFilter, JsMinFilter};
pub use process::{ProcessFilter, TypeScriptFilter};
pub use variables::VariablesFilter;
