pub mod codec;
pub mod dto;

pub use codec::*;
pub use dto::*;
