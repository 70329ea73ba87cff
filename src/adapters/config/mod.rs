pub mod file_store;
pub mod paths;

pub use file_store::*;
pub use paths::*;
