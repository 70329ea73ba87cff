pub mod error;
pub mod location;
pub mod project;

pub use error::*;
pub use location::*;
pub use project::*;
