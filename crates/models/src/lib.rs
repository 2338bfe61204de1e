pub mod odds;
pub mod provider;
pub mod prediction;
pub mod error;

pub use odds::*;
pub use provider::*;
pub use prediction::*;
pub use error::*;
