use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Required field missing: {0}")]
    MissingField(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
