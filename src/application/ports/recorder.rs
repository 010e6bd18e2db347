//! Segment recorder port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Container format a backend leaves on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentFormat {
    /// MPEG transport stream with muxed audio (picam)
    MpegTs,
    /// Raw H.264 elementary stream, no timing header (raspivid)
    H264,
}

impl SegmentFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::MpegTs => "ts",
            Self::H264 => "h264",
        }
    }

    /// Raw H.264 carries no frame rate, so the remux must force one
    pub const fn needs_forced_fps(&self) -> bool {
        matches!(self, Self::H264)
    }
}

/// One recording loop's worth of segments
#[derive(Debug, Clone)]
pub struct SegmentBatch {
    /// Name shared by all segments of the batch
    /// (e.g. "iter0-hive3-60fps-640x480")
    pub batch_name: String,
    /// Number of segments to record
    pub segments: u64,
    /// Duration of each segment in seconds
    pub segment_secs: u64,
}

/// Port for recording batches of video segments via an external
/// capture tool. Adapters own the camera parameters and the warmup,
/// spawn and teardown of the tool.
#[async_trait]
pub trait SegmentRecorder: Send + Sync {
    /// Record one batch of segments.
    ///
    /// # Returns
    /// Paths of the segment files that landed on disk. A segment the
    /// capture tool failed to produce is skipped, not an error.
    async fn record_batch(&self, batch: &SegmentBatch) -> Result<Vec<PathBuf>, RecorderError>;

    /// Directory where finished segments accumulate
    fn output_dir(&self) -> PathBuf;

    /// Container format this backend produces
    fn format(&self) -> SegmentFormat;
}
