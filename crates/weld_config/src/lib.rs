//! Parsing of `weld.toml` and construction of configured compilers.
//!
//! A `weld.toml` declares named stylesheet and script bundles. This crate
//! parses it into a [`WeldConfig`], merges per-kind defaults into each
//! bundle with [`resolve_bundle`], and turns resolved bundles into ready
//! [`Compiler`](weld_core::Compiler)s with [`build_compilers`].

#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod finder;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use factory::{build_compiler, build_compilers, NamedCompiler};
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_bundle, ResolvedBundle};
pub use types::*;
