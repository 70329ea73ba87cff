use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use color_eyre::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    adapters::map::satellite_view_url,
    application::ProjectService,
    domain::{LocationPick, Project},
    ports::{AppConfig, ConfigStore},
};

pub struct CliContext {
    pub service: ProjectService,
    pub config_store: Arc<dyn ConfigStore>,
    pub config: AppConfig,
    pub projects_dir: PathBuf,
}

#[derive(Serialize)]
struct ProjectView<'a> {
    #[serde(flatten)]
    project: &'a Project,
    map_url: String,
}

// `projects_dir` is the directory in effect for this run, after flag and
// environment overrides.
#[derive(Serialize)]
struct ConfigView<'a> {
    projects_dir: &'a PathBuf,
    configured_projects_dir: Option<&'a PathBuf>,
    default_project_name: &'a str,
}

fn project_arg() -> Arg {
    Arg::new("project")
        .value_name("PROJECT")
        .help("Project file path, file name, or project name")
        .required(true)
        .index(1)
}

fn coordinate_args() -> [Arg; 2] {
    [
        Arg::new("lat")
            .long("lat")
            .value_name("LATITUDE")
            .help("Latitude of the site")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true)
            .requires("lng"),
        Arg::new("lng")
            .long("lng")
            .value_name("LONGITUDE")
            .help("Longitude of the site")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true)
            .requires("lat"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("sunstruct")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage SunStruct solar design projects")
        .long_about("Manage SunStruct solar design projects.\n\nEach project is stored as one XML file in the projects directory.\nCommands print JSON on stdout.")
        .arg(
            Arg::new("projects-dir")
                .long("projects-dir")
                .value_name("DIR")
                .help("Projects directory (can also be set via SUNSTRUCT_PROJECTS_DIR env var)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("list").about("List projects as JSON").arg(
                Arg::new("starred")
                    .long("starred")
                    .help("Only starred projects")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("new")
                .about("Create a project")
                .arg(
                    Arg::new("name")
                        .value_name("NAME")
                        .help("Project name (defaults to the configured default name)")
                        .index(1),
                )
                .arg(
                    Arg::new("location")
                        .long("location")
                        .value_name("ADDRESS")
                        .help("Site address"),
                )
                .args(coordinate_args()),
        )
        .subcommand(
            Command::new("show")
                .about("Show a project and a link to its site on the map")
                .arg(project_arg()),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a project")
                .arg(project_arg())
                .arg(
                    Arg::new("name")
                        .value_name("NAME")
                        .help("New project name")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("star")
                .about("Toggle the star on a project")
                .arg(project_arg()),
        )
        .subcommand(
            Command::new("locate")
                .about("Set the site location of a project")
                .arg(project_arg())
                .arg(
                    Arg::new("address")
                        .value_name("ADDRESS")
                        .help("Site address")
                        .required(true)
                        .index(2),
                )
                .args(coordinate_args()),
        )
        .subcommand(
            Command::new("describe")
                .about("Set the description of a project")
                .arg(project_arg())
                .arg(
                    Arg::new("text")
                        .value_name("TEXT")
                        .help("New description")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a project file")
                .arg(project_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Show the effective configuration"))
                .subcommand(
                    Command::new("set-dir")
                        .about("Store projects in DIR from now on")
                        .arg(
                            Arg::new("dir")
                                .value_name("DIR")
                                .required(true)
                                .value_parser(value_parser!(PathBuf))
                                .index(1),
                        ),
                )
                .subcommand(
                    Command::new("set-default-name")
                        .about("Name given to projects created without one")
                        .arg(Arg::new("name").value_name("NAME").required(true).index(1)),
                ),
        )
}

fn location_pick(address: &str, matches: &ArgMatches) -> Result<LocationPick> {
    let pick = match (matches.get_one::<f64>("lat"), matches.get_one::<f64>("lng")) {
        (Some(latitude), Some(longitude)) => LocationPick::new(address, *latitude, *longitude)?,
        _ => LocationPick::address_only(address)?,
    };
    Ok(pick)
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_project(project: &Project) -> Result<()> {
    print_json(&ProjectView {
        project,
        map_url: satellite_view_url(project),
    })
}

/// Run the subcommand in `matches`. With no subcommand, lists projects.
pub async fn run(matches: &ArgMatches, context: &CliContext) -> Result<()> {
    let service = &context.service;

    match matches.subcommand() {
        Some(("list", list_matches)) => {
            let mut projects = service.list_projects().await?;
            if list_matches.get_flag("starred") {
                projects.retain(|project| project.is_starred);
            }
            print_json(&projects)?;
        }
        None => {
            print_json(&service.list_projects().await?)?;
        }
        Some(("new", new_matches)) => {
            let name = new_matches
                .get_one::<String>("name")
                .map(String::as_str)
                .unwrap_or_default();
            let pick = match new_matches.get_one::<String>("location") {
                Some(address) => Some(location_pick(address, new_matches)?),
                None => None,
            };
            let project = service.create_project(name, pick.as_ref()).await?;
            print_project(&project)?;
        }
        Some(("show", show_matches)) => {
            let project = service.find_project(required(show_matches, "project")).await?;
            print_project(&project)?;
        }
        Some(("rename", rename_matches)) => {
            let mut project = service
                .find_project(required(rename_matches, "project"))
                .await?;
            service
                .rename_project(&mut project, required(rename_matches, "name"))
                .await?;
            print_project(&project)?;
        }
        Some(("star", star_matches)) => {
            let mut project = service.find_project(required(star_matches, "project")).await?;
            service.toggle_star(&mut project).await?;
            print_project(&project)?;
        }
        Some(("locate", locate_matches)) => {
            let mut project = service
                .find_project(required(locate_matches, "project"))
                .await?;
            let pick = location_pick(required(locate_matches, "address"), locate_matches)?;
            service.set_location(&mut project, &pick).await?;
            print_project(&project)?;
        }
        Some(("describe", describe_matches)) => {
            let mut project = service
                .find_project(required(describe_matches, "project"))
                .await?;
            service
                .set_description(&mut project, required(describe_matches, "text"))
                .await?;
            print_project(&project)?;
        }
        Some(("delete", delete_matches)) => {
            let project = service
                .find_project(required(delete_matches, "project"))
                .await?;
            service.delete_project(&project).await?;
            print_json(&project)?;
        }
        Some(("config", config_matches)) => run_config(config_matches, context).await?,
        Some((other, _)) => color_eyre::eyre::bail!("Unknown command: {other}"),
    }

    Ok(())
}

async fn run_config(matches: &ArgMatches, context: &CliContext) -> Result<()> {
    let mut config = context.config.clone();

    match matches.subcommand() {
        Some(("set-dir", set_matches)) => {
            config.projects_dir = set_matches.get_one::<PathBuf>("dir").cloned();
            context.config_store.save_config(&config).await?;
        }
        Some(("set-default-name", set_matches)) => {
            let name = required(set_matches, "name").trim();
            if name.is_empty() {
                color_eyre::eyre::bail!("Default project name cannot be empty");
            }
            config.default_project_name = name.to_string();
            context.config_store.save_config(&config).await?;
        }
        _ => {}
    }

    print_json(&ConfigView {
        projects_dir: &context.projects_dir,
        configured_projects_dir: config.projects_dir.as_ref(),
        default_project_name: &config.default_project_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{config::FileConfigStore, storage::XmlProjectRepository};
    use crate::ports::RepositoryError;
    use tempfile::{tempdir, TempDir};

    fn context() -> (TempDir, CliContext) {
        let temp = tempdir().unwrap();
        let projects_dir = temp.path().join("Projects");
        let repository = Arc::new(XmlProjectRepository::new(&projects_dir));
        let context = CliContext {
            service: ProjectService::new(repository, "New Project"),
            config_store: Arc::new(FileConfigStore::with_path(temp.path().join("config.json"))),
            config: AppConfig::default(),
            projects_dir,
        };
        (temp, context)
    }

    fn parse(args: &[&str]) -> ArgMatches {
        build_cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_coordinates_must_come_in_pairs() {
        assert!(build_cli()
            .try_get_matches_from(["sunstruct", "new", "Site", "--lat", "37.7"])
            .is_err());
        let matches = parse(&["sunstruct", "new", "Site", "--lat", "37.7", "--lng", "-122.4"]);
        let (_, new_matches) = matches.subcommand().unwrap();
        assert_eq!(new_matches.get_one::<f64>("lng"), Some(&-122.4));
    }

    #[tokio::test]
    async fn test_new_then_locate_then_delete() {
        let (_temp, context) = context();

        run(&parse(&["sunstruct", "new", "Solar Farm"]), &context)
            .await
            .unwrap();
        run(
            &parse(&[
                "sunstruct",
                "locate",
                "Solar Farm",
                "789 Desert Ave, Las Vegas, NV 89123",
                "--lat",
                "36.1",
                "--lng",
                "-115.1",
            ]),
            &context,
        )
        .await
        .unwrap();

        let project = context.service.find_project("Solar Farm").await.unwrap();
        assert_eq!(project.location, "789 Desert Ave, Las Vegas, NV 89123");
        assert_eq!(project.longitude, -115.1);

        run(&parse(&["sunstruct", "delete", "Solar Farm"]), &context)
            .await
            .unwrap();
        assert!(context.service.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project_is_an_error() {
        let (_temp, context) = context();

        let err = run(&parse(&["sunstruct", "star", "Nobody"]), &context)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Nobody"));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected_before_saving() {
        let (_temp, context) = context();

        let result = run(
            &parse(&["sunstruct", "new", "Pole", "--location", "North Pole", "--lat", "95", "--lng", "0"]),
            &context,
        )
        .await;

        assert!(result.is_err());
        assert!(context.service.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_config_set_default_name_persists() {
        let (_temp, context) = context();

        run(
            &parse(&["sunstruct", "config", "set-default-name", "Untitled Site"]),
            &context,
        )
        .await
        .unwrap();

        let saved = context.config_store.load_config().await.unwrap();
        assert_eq!(saved.default_project_name, "Untitled Site");
    }

    #[tokio::test]
    async fn test_repository_errors_surface() {
        let (temp, context) = context();
        std::fs::write(temp.path().join("Projects"), "blocking file").unwrap();

        let err = run(&parse(&["sunstruct", "list"]), &context).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<crate::application::AppError>(),
            Some(crate::application::AppError::Repository(
                RepositoryError::StorageDirectoryUnavailable { .. }
            ))
        ));
    }
}
