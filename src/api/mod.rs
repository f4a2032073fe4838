//! API Module
//!
//! HTTP handlers and routing for the cache REST API.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
