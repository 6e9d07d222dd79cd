//! `weld list`: prints the configured bundles.

use weld_config::NamedCompiler;

use crate::project::load_compilers;
use crate::GlobalArgs;

/// Runs the `weld list` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let compilers = load_compilers(global)?;
    if compilers.is_empty() && !global.quiet {
        eprintln!("No bundles configured.");
    }
    for named in &compilers {
        println!("{}", describe(named));
    }
    Ok(0)
}

/// One line per bundle: kind, name, and file counts.
pub fn describe(named: &NamedCompiler) -> String {
    let collection = named.compiler.collection();
    let mut line = format!(
        "{}\t{}\t{} file(s)",
        named.kind,
        named.name,
        collection.files().len()
    );
    if !collection.remote_files().is_empty() {
        line.push_str(&format!(", {} remote", collection.remote_files().len()));
    }
    if !collection.watch_files().is_empty() {
        line.push_str(&format!(", {} watched", collection.watch_files().len()));
    }
    line
}
