//! Project discovery shared by every command.

use std::path::{Path, PathBuf};

use weld_config::{
    build_compilers, load_config, load_config_from_str, NamedCompiler, WeldConfig, CONFIG_FILE,
};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `weld.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the configuration selected by the global flags.
///
/// `--config` may name a file (loaded as is, its directory becomes the
/// project root) or a directory. Without it the current directory and its
/// parents are searched.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, WeldConfig), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    match global.config {
        Some(ref config_path) => {
            let path = cwd.join(config_path);
            if path.is_file() {
                let dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                let content = std::fs::read_to_string(&path)?;
                Ok((dir, load_config_from_str(&content)?))
            } else {
                let config = load_config(&path)?;
                Ok((path, config))
            }
        }
        None => {
            let dir = find_project_root(&cwd)?;
            let config = load_config(&dir)?;
            Ok((dir, config))
        }
    }
}

/// Loads the project and builds every configured compiler.
pub fn load_compilers(
    global: &GlobalArgs,
) -> Result<Vec<NamedCompiler>, Box<dyn std::error::Error>> {
    let (dir, config) = load_project(global)?;
    tracing::debug!(project = %dir.display(), "building compilers");
    Ok(build_compilers(&config, &dir)?)
}
