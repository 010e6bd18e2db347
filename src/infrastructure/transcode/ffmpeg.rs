//! FFmpeg transcoder adapter

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;
use tracing::info;

use crate::application::ports::{TranscodeError, Transcoder};

/// Transcoder shelling out to ffmpeg
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    /// Create a new ffmpeg transcoder
    pub fn new() -> Self {
        Self
    }

    /// Build remux args. The stream is copied, AAC audio gets the
    /// ADTS-to-ASC bitstream filter so it muxes into mp4. Raw H.264
    /// input carries no frame rate, so one can be forced ahead of `-i`.
    fn build_mp4_args(input: &Path, output: &Path, fps: Option<u32>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(fps) = fps {
            args.push("-framerate".to_string());
            args.push(fps.to_string());
        }
        args.extend([
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "copy".to_string(),
            "-bsf:a".to_string(),
            "aac_adtstoasc".to_string(),
            output.to_string_lossy().to_string(),
        ]);
        args
    }

    fn build_grayscale_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vf".to_string(),
            "format=gray".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    async fn run_ffmpeg(args: &[String]) -> Result<(), TranscodeError> {
        let output = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::FfmpegNotFound
                } else {
                    TranscodeError::ConversionFailed {
                        path: args.last().cloned().unwrap_or_default(),
                        message: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::ConversionFailed {
                path: args.last().cloned().unwrap_or_default(),
                message: stderr
                    .lines()
                    .last()
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }
        Ok(())
    }

    async fn finish(
        input: &Path,
        output: PathBuf,
        remove_orig: bool,
    ) -> Result<PathBuf, TranscodeError> {
        if !fs::try_exists(&output).await.unwrap_or(false) {
            return Err(TranscodeError::OutputMissing(
                output.to_string_lossy().to_string(),
            ));
        }
        info!("Converted and saved {}.", output.display());
        if remove_orig {
            fs::remove_file(input)
                .await
                .map_err(|e| TranscodeError::ConversionFailed {
                    path: input.to_string_lossy().to_string(),
                    message: e.to_string(),
                })?;
            info!("Deleted {}.", input.display());
        }
        Ok(output)
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_mp4(
        &self,
        input: &Path,
        fps: Option<u32>,
        remove_orig: bool,
    ) -> Result<PathBuf, TranscodeError> {
        let output = input.with_extension("mp4");
        let args = Self::build_mp4_args(input, &output, fps);
        Self::run_ffmpeg(&args).await?;
        Self::finish(input, output, remove_orig).await
    }

    async fn to_grayscale(
        &self,
        input: &Path,
        remove_orig: bool,
    ) -> Result<PathBuf, TranscodeError> {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let output = input.with_file_name(format!("gry-{}", file_name));
        let args = Self::build_grayscale_args(input, &output);
        Self::run_ffmpeg(&args).await?;
        Self::finish(input, output, remove_orig).await
    }
}
