pub mod routes;
pub mod error;
pub mod websocket;

pub use routes::*;
pub use error::*;
pub use websocket::*;
