//! MOT Proxy - a vehicle MOT history lookup service
//!
//! Proxies registration-plate lookups to the DVSA vehicle-history API,
//! caching results and the OAuth2 bearer token used to reach it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod mapper;
pub mod models;
pub mod registration;
pub mod service;
pub mod tasks;
pub mod token;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use service::VehicleLookupProxy;
pub use tasks::spawn_cleanup_task;
