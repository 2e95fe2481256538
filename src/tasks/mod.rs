//! Background Tasks Module
//!
//! Long-running maintenance tasks spawned at startup.

pub mod cleanup;

pub use cleanup::spawn_cleanup_task;
