pub mod config_store;
pub mod project_repository;

pub use config_store::*;
pub use project_repository::*;
