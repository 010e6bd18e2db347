//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod storage;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{Backend, CaptureSettings, SessionPlan};
pub use storage::{DiskUsage, OffloadPolicy};
