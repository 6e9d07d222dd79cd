//! The weld command-line interface. Builds and renders static asset bundles from `weld.toml`.
//!
//! Provides `weld generate` to write every stale bundle, `weld render` to
//! print the HTML tag for one bundle, and `weld list` to show what is
//! configured.

#![warn(missing_docs)]

mod generate;
mod list;
mod project;
mod render;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Concatenate, filter and cache CSS and JavaScript bundles.
#[derive(Parser, Debug)]
#[command(name = "weld", version, about = "Static asset bundler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `weld.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate configured bundles that are missing or stale.
    Generate(GenerateArgs),
    /// Generate one bundle and print its HTML element.
    Render(RenderArgs),
    /// List configured bundles.
    List,
}

/// Arguments for the `weld generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Regenerate even when bundles are up to date.
    #[arg(long)]
    pub force: bool,

    /// Only generate the bundle with this name.
    #[arg(short, long)]
    pub bundle: Option<String>,

    /// Output format for the list of generated files.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `weld render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Bundle kind, `css` or `js`.
    pub kind: String,

    /// Bundle name.
    pub name: String,

    /// Embed the bundle content instead of linking to it.
    #[arg(long, conflicts_with = "url")]
    pub inline: bool,

    /// Print only the public URL.
    #[arg(long)]
    pub url: bool,
}

/// Output format for generated files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One filename per line.
    Text,
    /// A JSON array of artifact descriptions.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Render(ref args) => render::run(args, &global),
        Command::List => list::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_default() {
        let cli = Cli::parse_from(["weld", "generate"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert!(!args.force);
                assert!(args.bundle.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "weld", "generate", "--force", "--bundle", "screen", "--format", "json",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert!(args.force);
                assert_eq!(args.bundle.as_deref(), Some("screen"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_render() {
        let cli = Cli::parse_from(["weld", "render", "js", "app", "--inline"]);
        match cli.command {
            Command::Render(ref args) => {
                assert_eq!(args.kind, "js");
                assert_eq!(args.name, "app");
                assert!(args.inline);
                assert!(!args.url);
            }
            _ => panic!("expected Render command"),
        }
    }

    #[test]
    fn render_inline_conflicts_with_url() {
        let result = Cli::try_parse_from(["weld", "render", "css", "screen", "--inline", "--url"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["weld", "--quiet", "--config", "site/weld.toml", "list"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("site/weld.toml"));
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["weld", "generate", "-v"]);
        assert!(cli.verbose);
    }
}
