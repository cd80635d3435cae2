//! Per-workspace TOML layers under `<workspace>/config/`.
//!
//! `config.toml` is read first, then the file named after the active
//! environment (`WHEN_ENV`, default `development`) so it can override the base.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENVIRONMENT_VAR: &str = "WHEN_ENV";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Environment name selecting the override layer
pub fn active_environment() -> String {
    std::env::var(ENVIRONMENT_VAR)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Candidate layer files for `environment`, lowest precedence first
pub fn layer_paths(workspace_root: &Path, environment: &str) -> Result<Vec<PathBuf>, ConfigError> {
    if environment.contains(['/', '\\']) || environment == ".." {
        return Err(ConfigError::Message(format!(
            "{} must be a bare name, got {:?}",
            ENVIRONMENT_VAR, environment
        )));
    }
    let dir = workspace_root.join("config");
    Ok(vec![
        dir.join("config.toml"),
        dir.join(format!("{}.toml", environment)),
    ])
}

/// Layer every existing workspace file onto `builder`
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let environment = active_environment();
    let layers = layer_paths(workspace_root, &environment)?;
    Ok(layers
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            debug!(config_path = %path.display(), environment = %environment, "Adding workspace config layer");
            builder.add_source(File::from(path).format(FileFormat::Toml))
        }))
}
