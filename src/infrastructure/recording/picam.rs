//! picam capture daemon adapter
//!
//! picam runs as a long-lived process spawned with the camera flags and
//! is driven through hook files: writing `filename=<name>` into
//! `hooks/start_record` starts a segment, touching `hooks/stop_record`
//! finalizes it into `archive/`. Audio comes from the USB microphone on
//! `hw:1,0`.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::fs;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::application::ports::{RecorderError, SegmentBatch, SegmentFormat, SegmentRecorder};
use crate::domain::recording::segment_filename;
use crate::domain::recording::settings::AWB_GREYWORLD;
use crate::domain::recording::CaptureSettings;

use super::WARMUP;

/// ALSA device of the USB microphone
const ALSA_DEVICE: &str = "hw:1,0";

/// Recorder driving the picam daemon
pub struct PicamRecorder {
    settings: CaptureSettings,
    picam_dir: PathBuf,
}

impl PicamRecorder {
    /// Create a recorder for the picam installation at `picam_dir`
    pub fn new(settings: CaptureSettings, picam_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            picam_dir: picam_dir.into(),
        }
    }

    /// Build the daemon's command line from the capture settings
    fn build_args(&self) -> Vec<String> {
        let s = &self.settings;
        let mut args = vec![
            "--alsadev".to_string(),
            ALSA_DEVICE.to_string(),
            "--width".to_string(),
            s.width.to_string(),
            "--height".to_string(),
            s.height.to_string(),
            "--fps".to_string(),
            s.fps.to_string(),
            "--mode".to_string(),
            s.camera_mode.to_string(),
        ];
        if s.hflip {
            args.push("--hflip".to_string());
        }
        if s.vflip {
            args.push("--vflip".to_string());
        }
        args.extend([
            "--wb".to_string(),
            AWB_GREYWORLD.to_string(),
            "--iso".to_string(),
            s.iso.to_string(),
        ]);
        args
    }

    fn hooks_dir(&self) -> PathBuf {
        self.picam_dir.join("hooks")
    }

    fn archive_dir(&self) -> PathBuf {
        self.picam_dir.join("archive")
    }

    fn rec_dir(&self) -> PathBuf {
        self.picam_dir.join("rec")
    }

    async fn spawn_daemon(&self) -> Result<Child, RecorderError> {
        Command::new("./picam")
            .args(self.build_args())
            .current_dir(&self.picam_dir)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecorderError::ToolNotFound("picam")
                } else {
                    RecorderError::StartFailed(e.to_string())
                }
            })
    }

    fn terminate(child: &Child) -> Result<(), RecorderError> {
        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), Signal::SIGTERM)
                .map_err(|e| RecorderError::CaptureFailed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl SegmentRecorder for PicamRecorder {
    async fn record_batch(&self, batch: &SegmentBatch) -> Result<Vec<PathBuf>, RecorderError> {
        let mut daemon = self.spawn_daemon().await?;
        sleep(WARMUP).await;
        info!("About to start recording {} segments...", batch.segments);

        let start_hook = self.hooks_dir().join("start_record");
        let stop_hook = self.hooks_dir().join("stop_record");
        let mut saved = Vec::new();

        for segment in 0..batch.segments {
            let filename = segment_filename(segment, &batch.batch_name, "ts");
            fs::write(&start_hook, format!("filename={}", filename))
                .await
                .map_err(|e| RecorderError::CaptureFailed(e.to_string()))?;
            sleep(Duration::from_secs(batch.segment_secs)).await;
            fs::write(&stop_hook, "")
                .await
                .map_err(|e| RecorderError::CaptureFailed(e.to_string()))?;

            let path = self.archive_dir().join(&filename);
            if fs::try_exists(&path).await.unwrap_or(false) {
                info!("Video saved, {}.", filename);
                saved.push(path);
            } else {
                warn!("Error recording video, {}.", filename);
            }
            // Let picam settle before the next start hook
            sleep(Duration::from_secs(1)).await;
        }

        info!("Recording finished.");
        Self::terminate(&daemon)?;
        let _ = daemon.wait().await;

        // picam keeps a duplicate of each recording under rec/
        for path in &saved {
            if let Some(name) = path.file_name() {
                let _ = fs::remove_file(self.rec_dir().join(name)).await;
            }
        }

        Ok(saved)
    }

    fn output_dir(&self) -> PathBuf {
        self.archive_dir()
    }

    fn format(&self) -> SegmentFormat {
        SegmentFormat::MpegTs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> PicamRecorder {
        PicamRecorder::new(CaptureSettings::default(), "/home/pi/picam")
    }

    #[test]
    fn args_forward_every_setting_unmodified() {
        let recorder = PicamRecorder::new(CaptureSettings::new(90, 1280, 720, 7), "/home/pi/picam");
        let args = recorder.build_args();

        for pair in [
            ["--alsadev", "hw:1,0"],
            ["--width", "1280"],
            ["--height", "720"],
            ["--fps", "90"],
            ["--mode", "7"],
            ["--wb", "greyworld"],
            ["--iso", "800"],
        ] {
            let pos = args.iter().position(|a| a == pair[0]).unwrap();
            assert_eq!(args[pos + 1], pair[1]);
        }
        assert!(args.contains(&"--hflip".to_string()));
        assert!(args.contains(&"--vflip".to_string()));
    }

    #[test]
    fn default_args_use_rig_defaults() {
        let args = recorder().build_args();
        let pos = args.iter().position(|a| a == "--width").unwrap();
        assert_eq!(args[pos + 1], "640");
        let pos = args.iter().position(|a| a == "--mode").unwrap();
        assert_eq!(args[pos + 1], "6");
    }

    #[test]
    fn directories_under_install_dir() {
        let r = recorder();
        assert_eq!(r.hooks_dir(), PathBuf::from("/home/pi/picam/hooks"));
        assert_eq!(r.archive_dir(), PathBuf::from("/home/pi/picam/archive"));
        assert_eq!(r.output_dir(), PathBuf::from("/home/pi/picam/archive"));
    }

    #[test]
    fn produces_mpegts() {
        assert_eq!(recorder().format(), SegmentFormat::MpegTs);
        assert_eq!(recorder().format().extension(), "ts");
        assert!(!recorder().format().needs_forced_fps());
    }
}
