//! # PriorAuth API
//! 
//! HTTP handlers, response envelope, and application state.

pub mod handlers;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
