use crate::domain::DomainError;
use crate::ports::{ConfigError, RepositoryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("No project matches {0:?}")]
    ProjectNotFound(String),

    #[error("{count} projects are named {selector:?}; select one by file name instead")]
    AmbiguousProject { selector: String, count: usize },
}

pub type AppResult<T> = Result<T, AppError>;
