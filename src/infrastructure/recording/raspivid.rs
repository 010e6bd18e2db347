//! raspivid pure-video adapter
//!
//! One raspivid invocation per segment, writing raw H.264 into the
//! local data directory. No audio, but usable at resolutions beyond
//! what picam handles (1640x922 and upwards). raspivid supports the
//! greyworld white balance natively.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::application::ports::{RecorderError, SegmentBatch, SegmentFormat, SegmentRecorder};
use crate::domain::recording::segment_filename;
use crate::domain::recording::settings::AWB_GREYWORLD;
use crate::domain::recording::CaptureSettings;

use super::WARMUP;

/// Recorder invoking raspivid per segment
pub struct RaspividRecorder {
    settings: CaptureSettings,
    data_dir: PathBuf,
}

impl RaspividRecorder {
    /// Create a recorder writing segments into `data_dir`
    pub fn new(settings: CaptureSettings, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            data_dir: data_dir.into(),
        }
    }

    /// Build one segment's command line
    fn build_args(&self, output: &str, duration_ms: u64) -> Vec<String> {
        let s = &self.settings;
        let mut args = vec![
            "-n".to_string(), // headless, no preview
            "-t".to_string(),
            duration_ms.to_string(),
            "-w".to_string(),
            s.width.to_string(),
            "-h".to_string(),
            s.height.to_string(),
            "-fps".to_string(),
            s.fps.to_string(),
            "-md".to_string(),
            s.camera_mode.to_string(),
            "-ISO".to_string(),
            s.iso.to_string(),
            "-awb".to_string(),
            AWB_GREYWORLD.to_string(),
        ];
        if s.hflip {
            args.push("-hf".to_string());
        }
        if s.vflip {
            args.push("-vf".to_string());
        }
        args.extend(["-o".to_string(), output.to_string()]);
        args
    }
}

#[async_trait]
impl SegmentRecorder for RaspividRecorder {
    async fn record_batch(&self, batch: &SegmentBatch) -> Result<Vec<PathBuf>, RecorderError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| RecorderError::StartFailed(e.to_string()))?;
        sleep(WARMUP).await;
        info!("About to start recording {} segments...", batch.segments);

        let mut saved = Vec::new();
        for segment in 0..batch.segments {
            let filename = segment_filename(segment, &batch.batch_name, "h264");
            let path = self.data_dir.join(&filename);
            let args = self.build_args(&path.to_string_lossy(), batch.segment_secs * 1000);

            let status = Command::new("raspivid")
                .args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status()
                .await
                .map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        RecorderError::ToolNotFound("raspivid")
                    } else {
                        RecorderError::StartFailed(e.to_string())
                    }
                })?;

            if !status.success() {
                warn!("raspivid exited with status {} on {}", status, filename);
            }

            if fs::try_exists(&path).await.unwrap_or(false) {
                info!("Video saved, {}.", filename);
                saved.push(path);
            } else {
                warn!("Error recording video, {}.", filename);
            }
        }

        Ok(saved)
    }

    fn output_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn format(&self) -> SegmentFormat {
        SegmentFormat::H264
    }
}
