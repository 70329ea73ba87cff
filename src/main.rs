use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

mod adapters;
mod application;
mod domain;
mod ports;

use adapters::{
    cli::{build_cli, run, CliContext},
    config::{app_data_dir, resolve_projects_dir, FileConfigStore},
    storage::XmlProjectRepository,
};
use application::ProjectService;
use ports::ConfigStore;

fn init_logging() -> Result<()> {
    let log_dir = app_data_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("sunstruct.log"))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries JSON, so logs go to a file
    init_logging()?;

    let matches = build_cli().get_matches();

    let config_store = Arc::new(FileConfigStore::new()?);
    tracing::debug!("Config file: {}", config_store.config_path().display());
    let config = config_store.load_config().await?;

    let projects_dir =
        resolve_projects_dir(matches.get_one::<PathBuf>("projects-dir").cloned(), &config)?;
    let repository = Arc::new(XmlProjectRepository::new(projects_dir.clone()));
    tracing::info!("Using projects directory: {}", repository.projects_dir().display());
    let service = ProjectService::new(repository, config.default_project_name.clone());

    let context = CliContext {
        service,
        config_store,
        config,
        projects_dir,
    };

    if let Err(e) = run(&matches, &context).await {
        tracing::error!("Command failed: {e}");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    Ok(())
}
