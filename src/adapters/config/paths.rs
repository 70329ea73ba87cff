//! Storage directory resolution.

use crate::ports::{AppConfig, ConfigError, ConfigResult};
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "sunstruct";
pub const PROJECTS_DIR_NAME: &str = "Projects";
pub const PROJECTS_DIR_ENV: &str = "SUNSTRUCT_PROJECTS_DIR";

/// Per-user application data directory, e.g. `~/.local/share/sunstruct`.
pub fn app_data_dir() -> ConfigResult<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        ConfigError::ReadError("Cannot determine local data directory".to_string())
    })?;
    Ok(data_dir.join(APP_DIR_NAME))
}

pub fn default_projects_dir() -> ConfigResult<PathBuf> {
    Ok(app_data_dir()?.join(PROJECTS_DIR_NAME))
}

/// Resolution order:
/// 1. `cli_override` (the `--projects-dir` flag)
/// 2. `SUNSTRUCT_PROJECTS_DIR` environment variable
/// 3. `projects_dir` from the config file
/// 4. [`default_projects_dir`]
pub fn resolve_projects_dir(
    cli_override: Option<PathBuf>,
    config: &AppConfig,
) -> ConfigResult<PathBuf> {
    let env_override = std::env::var_os(PROJECTS_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    pick_projects_dir(cli_override, env_override, config)
}

fn pick_projects_dir(
    cli_override: Option<PathBuf>,
    env_override: Option<PathBuf>,
    config: &AppConfig,
) -> ConfigResult<PathBuf> {
    match cli_override
        .or(env_override)
        .or_else(|| config.projects_dir.clone())
    {
        Some(dir) => Ok(dir),
        None => default_projects_dir(),
    }
}
