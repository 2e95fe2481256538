//! API Module
//!
//! HTTP handlers and routing for the lookup proxy's REST surface.
//!
//! # Endpoints
//! - `GET /vehicles/:registration` - Look up vehicle details
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
