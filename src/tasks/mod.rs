//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiration sweep: drops expired entries the read path has not touched

mod sweep;

pub use sweep::spawn_sweep_task;
