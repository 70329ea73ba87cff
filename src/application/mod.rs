pub mod error;
pub mod project_service;

pub use error::*;
pub use project_service::*;
