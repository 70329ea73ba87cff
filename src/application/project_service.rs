use super::{AppError, AppResult};
use crate::domain::*;
use crate::ports::{ProjectRepository, RepositoryError};
use std::path::Path;
use std::sync::Arc;

/// Project use cases for whatever front end is driving the store.
///
/// Every method awaits the repository before returning, so callers observe
/// completion (and failure) of each save.
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    default_name: String,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>, default_name: impl Into<String>) -> Self {
        Self {
            repository,
            default_name: default_name.into(),
        }
    }

    /// Starred first, then most recently modified, then by name.
    pub async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let mut projects = self.repository.enumerate_all().await?;
        sort_for_display(&mut projects);
        Ok(projects)
    }

    pub async fn create_project(
        &self,
        name: &str,
        location: Option<&LocationPick>,
    ) -> AppResult<Project> {
        let name = match name.trim() {
            "" => self.default_name.clone(),
            trimmed => trimmed.to_string(),
        };

        let mut project = Project::new(name);
        if let Some(pick) = location {
            project.apply_location(pick);
        }

        tracing::info!("Creating project with name: {}", project.name);
        self.repository.create(&mut project).await?;
        Ok(project)
    }

    /// Resolve `selector` as a path to a project file, a file stem, or a
    /// project name (case-insensitive).
    pub async fn find_project(&self, selector: &str) -> AppResult<Project> {
        let path = Path::new(selector);
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if is_file {
            return self.repository.load(path).await.map_err(|e| match e {
                RepositoryError::NotFound(_) => AppError::ProjectNotFound(selector.to_string()),
                other => other.into(),
            });
        }

        let projects = self.repository.enumerate_all().await?;

        if let Some(project) = projects
            .iter()
            .find(|project| project.file_stem() == Some(selector))
        {
            return Ok(project.clone());
        }

        let wanted = selector.trim().to_lowercase();
        let mut matches: Vec<Project> = projects
            .into_iter()
            .filter(|project| project.name.to_lowercase() == wanted)
            .collect();

        match matches.len() {
            0 => Err(AppError::ProjectNotFound(selector.to_string())),
            1 => Ok(matches.remove(0)),
            count => Err(AppError::AmbiguousProject {
                selector: selector.to_string(),
                count,
            }),
        }
    }

    pub async fn rename_project(&self, project: &mut Project, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingField("name".to_string()).into());
        }

        project.name = name.to_string();
        self.repository.update(project).await?;
        Ok(())
    }

    /// Flip the star and return the new state.
    pub async fn toggle_star(&self, project: &mut Project) -> AppResult<bool> {
        project.is_starred = !project.is_starred;
        self.repository.update(project).await?;
        Ok(project.is_starred)
    }

    pub async fn set_location(&self, project: &mut Project, pick: &LocationPick) -> AppResult<()> {
        project.apply_location(pick);
        self.repository.update(project).await?;
        Ok(())
    }

    pub async fn set_description(&self, project: &mut Project, description: &str) -> AppResult<()> {
        project.description = description.trim().to_string();
        self.repository.update(project).await?;
        Ok(())
    }

    pub async fn delete_project(&self, project: &Project) -> AppResult<()> {
        if !project.is_persisted() {
            tracing::debug!("Project {:?} was never saved, nothing to delete", project.name);
            return Ok(());
        }
        self.repository.delete(project).await?;
        Ok(())
    }
}

fn sort_for_display(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        b.is_starred
            .cmp(&a.is_starred)
            .then_with(|| b.last_modified_date.cmp(&a.last_modified_date))
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::XmlProjectRepository;
    use crate::ports::MockProjectRepository;
    use chrono::{Duration, Utc};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn xml_service() -> (TempDir, ProjectService) {
        let temp = tempdir().unwrap();
        let repo = XmlProjectRepository::new(temp.path().join("Projects"));
        (temp, ProjectService::new(Arc::new(repo), "New Project"))
    }

    fn project(name: &str, starred: bool, age_minutes: i64) -> Project {
        let mut project = Project::new(name);
        project.is_starred = starred;
        project.last_modified_date = Utc::now() - Duration::minutes(age_minutes);
        project
    }

    #[tokio::test]
    async fn test_list_orders_starred_then_recent() {
        let mut repo = MockProjectRepository::new();
        repo.expect_enumerate_all().times(1).returning(|| {
            Ok(vec![
                project("Old Plain", false, 60),
                project("Old Starred", true, 60),
                project("New Plain", false, 1),
                project("New Starred", true, 1),
            ])
        });
        let service = ProjectService::new(Arc::new(repo), "New Project");

        let names: Vec<String> = service
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, ["New Starred", "Old Starred", "New Plain", "Old Plain"]);
    }

    #[tokio::test]
    async fn test_create_blank_name_uses_default() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create().times(1).returning(|project| {
            assert_eq!(project.name, "Untitled Site");
            let path = PathBuf::from("/p/Untitled_Site_20240101_000000.xml");
            project.file_path = Some(path.clone());
            Ok(path)
        });
        let service = ProjectService::new(Arc::new(repo), "Untitled Site");

        let created = service.create_project("   ", None).await.unwrap();

        assert_eq!(created.name, "Untitled Site");
        assert!(created.is_persisted());
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create().returning(|_| {
            Err(RepositoryError::StorageWriteFailed {
                path: PathBuf::from("/p/Full_Disk.xml"),
                reason: "No space left on device".to_string(),
            })
        });
        let service = ProjectService::new(Arc::new(repo), "New Project");

        let err = service.create_project("Full Disk", None).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Repository(RepositoryError::StorageWriteFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_with_location() {
        let (_temp, service) = xml_service();
        let pick = LocationPick::new("123 Valley Rd, San Jose, CA 95123", 37.26, -121.83).unwrap();

        let created = service
            .create_project(" Residential Solar ", Some(&pick))
            .await
            .unwrap();

        assert_eq!(created.name, "Residential Solar");
        assert_eq!(created.location, "123 Valley Rd, San Jose, CA 95123");
        assert_eq!(created.description, created.location);
        assert_eq!(created.latitude, 37.26);
        assert_eq!(service.list_projects().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_find_by_name_stem_and_path() {
        let (_temp, service) = xml_service();
        let created = service.create_project("Solar Farm", None).await.unwrap();
        service.create_project("Commercial Demo", None).await.unwrap();

        assert_eq!(service.find_project("solar farm").await.unwrap(), created);

        let stem = created.file_stem().unwrap().to_string();
        assert_eq!(service.find_project(&stem).await.unwrap(), created);

        let path = created.file_path.clone().unwrap();
        let by_path = service
            .find_project(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(by_path, created);
    }

    #[tokio::test]
    async fn test_find_unknown_and_ambiguous() {
        let (_temp, service) = xml_service();
        service.create_project("Twin", None).await.unwrap();
        service.create_project("twin", None).await.unwrap();

        assert!(matches!(
            service.find_project("Nobody").await,
            Err(AppError::ProjectNotFound(_))
        ));
        assert!(matches!(
            service.find_project("TWIN").await,
            Err(AppError::AmbiguousProject { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_edits_keep_file_path() {
        let (_temp, service) = xml_service();
        let mut project = service.create_project("Commercial Demo", None).await.unwrap();
        let path = project.file_path.clone();

        service.rename_project(&mut project, "Commercial Demo 2").await.unwrap();
        assert!(service.toggle_star(&mut project).await.unwrap());
        service
            .set_location(
                &mut project,
                &LocationPick::address_only("456 Market St, San Francisco, CA 94105").unwrap(),
            )
            .await
            .unwrap();
        service.set_description(&mut project, "Rooftop array").await.unwrap();

        assert_eq!(project.file_path, path);
        let stored = service.find_project("Commercial Demo 2").await.unwrap();
        assert_eq!(stored, project);
        assert!(stored.is_starred);
        assert_eq!(stored.location, "456 Market St, San Francisco, CA 94105");
        assert_eq!(stored.description, "Rooftop array");
    }

    #[tokio::test]
    async fn test_rename_rejects_blank() {
        let (_temp, service) = xml_service();
        let mut project = service.create_project("Keep Me", None).await.unwrap();

        let err = service.rename_project(&mut project, "  ").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::InvalidInput(DomainError::MissingField(_))
        ));
        assert_eq!(project.name, "Keep Me");
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let (_temp, service) = xml_service();
        let project = service.create_project("Short Lived", None).await.unwrap();

        service.delete_project(&project).await.unwrap();
        service.delete_project(&project).await.unwrap();

        assert!(service.list_projects().await.unwrap().is_empty());
    }
}
