//! Data models for the lookup proxy
//!
//! The normalized vehicle record plus the DTOs serialized on the
//! health and stats endpoints.

pub mod responses;
pub mod vehicle;

pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
pub use vehicle::VehicleRecord;
