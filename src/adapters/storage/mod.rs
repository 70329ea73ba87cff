pub mod file_name;
pub mod project_repo;

pub use file_name::*;
pub use project_repo::*;
