use async_trait::async_trait;
use chrono::{Local, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use super::{disambiguated_file_name, is_project_file, project_file_name};
use crate::{
    adapters::xml,
    domain::Project,
    ports::{ProjectRepository, RepositoryError, RepositoryResult},
};

/// Stores each project as one XML file in a flat directory.
///
/// The directory is created on demand before every operation, so a fresh
/// install or a directory removed while running is repaired rather than
/// reported.
#[derive(Debug, Clone)]
pub struct XmlProjectRepository {
    projects_dir: PathBuf,
}

impl XmlProjectRepository {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    async fn ensure_projects_dir(&self) -> RepositoryResult<()> {
        match fs::metadata(&self.projects_dir).await {
            Ok(meta) if meta.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(self.unavailable("exists but is not a directory".to_string()));
            }
            Err(_) => {}
        }

        fs::create_dir_all(&self.projects_dir)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        tracing::info!("Created projects directory: {}", self.projects_dir.display());
        Ok(())
    }

    fn unavailable(&self, reason: String) -> RepositoryError {
        RepositoryError::StorageDirectoryUnavailable {
            path: self.projects_dir.clone(),
            reason,
        }
    }

    async fn read_project(&self, path: &Path) -> RepositoryResult<Project> {
        let content = fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => RepositoryError::NotFound(path.to_path_buf()),
            _ => RepositoryError::MalformedRecord {
                path: path.to_path_buf(),
                reason: format!("could not read file: {e}"),
            },
        })?;

        let mut project = xml::decode(&content).map_err(|e| RepositoryError::MalformedRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        project.file_path = Some(path.to_path_buf());
        Ok(project)
    }

    async fn write_project(&self, path: &Path, project: &Project) -> RepositoryResult<()> {
        let write_failed = |reason: String| RepositoryError::StorageWriteFailed {
            path: path.to_path_buf(),
            reason,
        };

        let document = xml::encode(project).map_err(|e| write_failed(e.to_string()))?;
        fs::write(path, document)
            .await
            .map_err(|e| write_failed(e.to_string()))
    }

    async fn new_file_path(&self, name: &str) -> RepositoryResult<PathBuf> {
        let stamp = Local::now().naive_local();
        let candidate = self.projects_dir.join(project_file_name(name, &stamp));
        if !path_exists(&candidate).await? {
            return Ok(candidate);
        }

        let token = Uuid::new_v4().simple().to_string();
        let path = self
            .projects_dir
            .join(disambiguated_file_name(name, &stamp, &token[..8]));
        tracing::debug!(
            "{} already exists, using {}",
            candidate.display(),
            path.display()
        );
        Ok(path)
    }
}

/// `false` only when the path is confirmed absent; any other I/O failure is
/// reported so callers never mistake an unreadable file for a missing one.
async fn path_exists(path: &Path) -> RepositoryResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| RepositoryError::StorageWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl ProjectRepository for XmlProjectRepository {
    async fn enumerate_all(&self) -> RepositoryResult<Vec<Project>> {
        self.ensure_projects_dir().await?;

        let mut entries = fs::read_dir(&self.projects_dir)
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        let mut projects = Vec::new();
        let mut skipped = 0usize;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?
        {
            let path = entry.path();
            if !is_project_file(&path) {
                continue;
            }
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }

            match self.read_project(&path).await {
                Ok(project) => {
                    tracing::debug!("Loaded project: {}", project.name);
                    projects.push(project);
                }
                Err(e) => {
                    tracing::warn!("Skipping project file: {}", e);
                    skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Loaded {} projects from {} ({} skipped)",
            projects.len(),
            self.projects_dir.display(),
            skipped
        );
        Ok(projects)
    }

    async fn load(&self, path: &Path) -> RepositoryResult<Project> {
        self.ensure_projects_dir().await?;
        self.read_project(path).await
    }

    async fn create(&self, project: &mut Project) -> RepositoryResult<PathBuf> {
        self.ensure_projects_dir().await?;

        let path = self.new_file_path(&project.name).await?;
        let previous_path = project.file_path.replace(path.clone());
        let previous_modified = std::mem::replace(&mut project.last_modified_date, Utc::now());

        if let Err(e) = self.write_project(&path, project).await {
            project.file_path = previous_path;
            project.last_modified_date = previous_modified;
            tracing::error!("Error saving project {:?}: {}", project.name, e);
            return Err(e);
        }

        tracing::info!("Project saved to: {}", path.display());
        Ok(path)
    }

    async fn update(&self, project: &mut Project) -> RepositoryResult<()> {
        let existing = match project.file_path.clone() {
            Some(path) => path_exists(&path).await?.then_some(path),
            None => None,
        };
        let Some(path) = existing else {
            self.create(project).await?;
            return Ok(());
        };
        self.ensure_projects_dir().await?;

        let previous_modified = std::mem::replace(&mut project.last_modified_date, Utc::now());

        if let Err(e) = self.write_project(&path, project).await {
            project.last_modified_date = previous_modified;
            tracing::error!("Error updating project {:?}: {}", project.name, e);
            return Err(e);
        }

        tracing::info!("Project updated at: {}", path.display());
        Ok(())
    }

    async fn delete(&self, project: &Project) -> RepositoryResult<()> {
        self.ensure_projects_dir().await?;

        let Some(path) = project.file_path() else {
            return Ok(());
        };

        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::info!("Project deleted: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Project file already gone: {}", path.display());
                Ok(())
            }
            Err(e) => Err(RepositoryError::StorageWriteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}
