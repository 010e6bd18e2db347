//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod lighting;
pub mod recorder;
pub mod storage;
pub mod transcoder;

// Re-export common types
pub use config::ConfigStore;
pub use lighting::{Lighting, LightingError};
pub use recorder::{RecorderError, SegmentBatch, SegmentFormat, SegmentRecorder};
pub use storage::{SegmentStore, StorageError};
pub use transcoder::{TranscodeError, Transcoder};
