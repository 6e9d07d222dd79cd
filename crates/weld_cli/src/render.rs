//! `weld render`: generates one bundle and prints its HTML element.

use weld_config::{build_compiler, resolve_bundle, BundleKind, NamedCompiler};
use weld_render::{CssRenderer, JsRenderer, Loader, Renderer};

use crate::project::load_project;
use crate::{GlobalArgs, RenderArgs};

/// What to print for the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Remote elements followed by the bundle's element.
    Tags,
    /// The bundle content embedded in a `<style>` or `<script>` element.
    Inline,
    /// The bundle's public URL.
    Url,
}

impl Output {
    fn from_args(args: &RenderArgs) -> Self {
        if args.inline {
            Output::Inline
        } else if args.url {
            Output::Url
        } else {
            Output::Tags
        }
    }
}

/// Runs the `weld render` command.
///
/// Only the requested bundle is built, so a broken sibling bundle does not
/// prevent rendering.
pub fn run(args: &RenderArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let kind: BundleKind = args.kind.parse()?;
    let (dir, config) = load_project(global)?;
    let bundle = resolve_bundle(&config, kind, &args.name)?;
    let named = build_compiler(&config, &bundle, &dir)?;

    match render_bundle(named, Output::from_args(args))? {
        Some(html) => {
            println!("{html}");
            Ok(0)
        }
        None => {
            if !global.quiet {
                eprintln!("No files generated.");
            }
            Ok(1)
        }
    }
}

/// Renders a configured bundle.
///
/// Returns `None` for inline or URL output when the bundle has no local
/// files to generate.
pub fn render_bundle(
    named: NamedCompiler,
    output: Output,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let loader = Loader::new(named.compiler, named.public_path);
    let renderer: Box<dyn Renderer> = match named.kind {
        BundleKind::Css => Box::new(CssRenderer::new(loader)),
        BundleKind::Js => Box::new(JsRenderer::new(loader)),
    };

    if output == Output::Tags {
        return Ok(Some(renderer.render()?));
    }

    let Some(artifact) = renderer.loader().compiler().generate()? else {
        return Ok(None);
    };
    let html = match output {
        Output::Inline => renderer.inline_element(&artifact)?,
        _ => renderer.url(&artifact),
    };
    Ok(Some(html))
}
