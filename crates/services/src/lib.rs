pub mod error;
pub mod normalizer;
pub mod signals;
pub mod store;
pub mod broadcaster;
pub mod odds_feed;
pub mod ingest;
pub mod predictor;

pub use error::*;
pub use normalizer::*;
pub use signals::*;
pub use store::*;
pub use broadcaster::*;
pub use odds_feed::*;
pub use ingest::*;
pub use predictor::*;
