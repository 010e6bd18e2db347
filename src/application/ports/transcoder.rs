//! Transcoder port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Transcoding errors
#[derive(Debug, Clone, Error)]
pub enum TranscodeError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("ffmpeg failed on {path}: {message}")]
    ConversionFailed { path: String, message: String },

    #[error("Converted file missing: {0}")]
    OutputMissing(String),
}

/// Port for converting recorded segments via an external transcoder
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Remux a segment into an mp4 next to the input.
    ///
    /// # Arguments
    /// * `input` - The segment file to remux
    /// * `fps` - Frame rate to force (required for raw H.264 input)
    /// * `remove_orig` - Delete the input file after a successful remux
    ///
    /// # Returns
    /// Path of the mp4 file
    async fn to_mp4(
        &self,
        input: &Path,
        fps: Option<u32>,
        remove_orig: bool,
    ) -> Result<PathBuf, TranscodeError>;

    /// Re-encode a video as grayscale, saved next to the input with a
    /// "gry-" prefix.
    async fn to_grayscale(&self, input: &Path, remove_orig: bool)
        -> Result<PathBuf, TranscodeError>;
}
