//! Request and Response models for the cache API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ExpirationRequest, SetRequest, SlidingToggleRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, ExistsResponse, GetResponse, HealthResponse, SetResponse,
    SlidingToggleResponse, StatsResponse, TtlResponse,
};
