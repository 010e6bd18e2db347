//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the external capture tools, ffmpeg, the BrightPi
//! accessory and the filesystem.

pub mod config;
pub mod lighting;
pub mod recording;
pub mod storage;
pub mod transcode;

// Re-export adapters
pub use config::XdgConfigStore;
pub use lighting::{BrightPiLighting, NoOpLighting};
pub use recording::{PicamRecorder, RaspividRecorder};
pub use storage::LocalSegmentStore;
pub use transcode::FfmpegTranscoder;
