//! `weld generate`: writes every missing or stale bundle.

use serde::Serialize;
use weld_config::NamedCompiler;
use weld_core::Artifact;

use crate::project::load_compilers;
use crate::{GenerateArgs, GlobalArgs, ReportFormat};

/// One generated bundle in `--format json` output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Bundle name from `weld.toml`.
    pub bundle: String,
    /// Generated filename.
    pub file: String,
    /// Modification time, seconds since the Unix epoch.
    pub last_modified: u64,
    /// Concatenated source files, in order.
    pub source_files: Vec<String>,
}

impl GeneratedFile {
    fn new(bundle: &str, artifact: &Artifact) -> Self {
        Self {
            bundle: bundle.to_string(),
            file: artifact.file().to_string(),
            last_modified: artifact.timestamp(),
            source_files: artifact
                .source_files()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
    }
}

/// Runs the `weld generate` command.
///
/// Returns exit code 0 if at least one bundle was produced, 1 otherwise.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut compilers = load_compilers(global)?;
    if let Some(ref wanted) = args.bundle {
        compilers.retain(|c| &c.name == wanted);
        if compilers.is_empty() {
            return Err(format!("no bundle named '{wanted}'").into());
        }
    }

    let generated = generate_all(&mut compilers, args.force)?;

    if generated.is_empty() {
        if !global.quiet {
            eprintln!("No files generated.");
        }
        return Ok(1);
    }

    println!("{}", report(&generated, args.format, global.verbose)?);
    Ok(0)
}

/// Formats the generated files for stdout.
pub fn report(
    generated: &[GeneratedFile],
    format: ReportFormat,
    verbose: bool,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => {
            let mut lines = Vec::new();
            for file in generated {
                lines.push(file.file.clone());
                if verbose {
                    lines.extend(file.source_files.iter().map(|s| format!("  {s}")));
                }
            }
            Ok(lines.join("\n"))
        }
        ReportFormat::Json => serde_json::to_string_pretty(generated),
    }
}

/// Generates each bundle in order, stopping at the first failure.
pub fn generate_all(
    compilers: &mut [NamedCompiler],
    force: bool,
) -> Result<Vec<GeneratedFile>, Box<dyn std::error::Error>> {
    let mut generated = Vec::new();
    for named in compilers.iter_mut() {
        if force {
            named.compiler.enable_debugging(true);
        }
        let artifact = named
            .compiler
            .generate()
            .map_err(|e| format!("bundle '{}': {e}", named.name))?;
        if let Some(artifact) = artifact {
            generated.push(GeneratedFile::new(&named.name, &artifact));
        }
    }
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use weld_config::{build_compilers, load_config_from_str};

    fn compilers(dir: &std::path::Path) -> Vec<NamedCompiler> {
        fs::create_dir_all(dir.join("www/css")).unwrap();
        fs::create_dir_all(dir.join("www/webtemp")).unwrap();
        fs::write(dir.join("www/css/a.css"), "a{}").unwrap();
        let config = load_config_from_str(
            r#"
[css.screen]
files = ["a.css"]

[js.cdn]
remote_files = ["https://cdn.test/lib.js"]
"#,
        )
        .unwrap();
        build_compilers(&config, dir).unwrap()
    }

    #[test]
    fn skips_bundles_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut compilers = compilers(dir.path());
        let generated = generate_all(&mut compilers, false).unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].bundle, "screen");
        assert!(generated[0].file.ends_with(".css"));
        assert_eq!(generated[0].source_files.len(), 1);
    }

    #[test]
    fn force_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut compilers = compilers(dir.path());
        let first = generate_all(&mut compilers, false).unwrap();
        let path = dir.path().join("www/webtemp").join(&first[0].file);
        fs::write(&path, "stale").unwrap();

        generate_all(&mut compilers, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");

        generate_all(&mut compilers, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\na{}");
    }

    fn sample() -> GeneratedFile {
        GeneratedFile {
            bundle: "screen".to_string(),
            file: "abc.css".to_string(),
            last_modified: 7,
            source_files: vec!["/www/css/a.css".to_string()],
        }
    }

    #[test]
    fn text_report() {
        let files = [sample()];
        assert_eq!(report(&files, ReportFormat::Text, false).unwrap(), "abc.css");
        assert_eq!(
            report(&files, ReportFormat::Text, true).unwrap(),
            "abc.css\n  /www/css/a.css"
        );
    }

    #[test]
    fn json_report_is_an_array() {
        let out = report(&[sample()], ReportFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["file"], "abc.css");
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[test]
    fn json_shape() {
        let file = sample();
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["bundle"], "screen");
        assert_eq!(json["file"], "abc.css");
        assert_eq!(json["last_modified"], 7);
        assert_eq!(json["source_files"][0], "/www/css/a.css");
    }
}
