use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PROJECT_NAME: &str = "New Project";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(String),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Overrides the platform default storage directory.
    pub projects_dir: Option<PathBuf>,
    /// Name given to projects created without one.
    pub default_project_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: None,
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_config(&self) -> ConfigResult<AppConfig>;
    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()>;
}
