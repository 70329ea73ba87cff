use crate::domain::Project;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Malformed project record {path}: {reason}")]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("Failed to write project storage at {path}: {reason}")]
    StorageWriteFailed { path: PathBuf, reason: String },

    #[error("Project directory {path} is unavailable: {reason}")]
    StorageDirectoryUnavailable { path: PathBuf, reason: String },

    #[error("Project file not found: {0}")]
    NotFound(PathBuf),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Owner of the persisted project collection.
///
/// Every method is a complete unit of work: no file handle or record
/// reference outlives the call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Every decodable record in storage, in directory order. Files that fail
    /// to decode are skipped.
    async fn enumerate_all(&self) -> RepositoryResult<Vec<Project>>;

    /// Read a single record file.
    async fn load(&self, path: &Path) -> RepositoryResult<Project>;

    /// Persist a new record under a freshly derived file name and return it.
    /// On failure `project` is left untouched.
    async fn create(&self, project: &mut Project) -> RepositoryResult<PathBuf>;

    /// Overwrite the record's backing file, or create one if it has none.
    async fn update(&self, project: &mut Project) -> RepositoryResult<()>;

    /// Remove the backing file. Missing files are not an error.
    async fn delete(&self, project: &Project) -> RepositoryResult<()>;
}
