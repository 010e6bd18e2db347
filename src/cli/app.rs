//! Main app runner for recording sessions and conversions

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;

use crate::application::ports::{Lighting, SegmentRecorder, SegmentStore, Transcoder};
use crate::application::{RecordSessionUseCase, SessionCallbacks, SessionInput};
use crate::domain::config::AppConfig;
use crate::domain::recording::{Backend, CaptureSettings, SessionPlan};
use crate::infrastructure::{
    BrightPiLighting, FfmpegTranscoder, LocalSegmentStore, NoOpLighting, PicamRecorder,
    RaspividRecorder, XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Resolved options for one recording session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub experiment_name: String,
    pub settings: CaptureSettings,
    pub plan: SessionPlan,
    pub backend: Backend,
    pub ir: bool,
    pub picam_dir: PathBuf,
    pub data_dir: PathBuf,
    pub usb_dir: PathBuf,
}

/// Run a recording session with the selected backend and lighting
pub async fn run_session(options: SessionOptions) -> ExitCode {
    info!(
        "Running session '{}' via {} ({}, segments {}s, session {}s, ir {})",
        options.experiment_name,
        options.backend,
        options.settings.run_details(),
        options.plan.segment_secs(),
        options.plan.session_secs(),
        options.ir,
    );

    match (options.backend, options.ir) {
        (Backend::Picam, false) => {
            let recorder = PicamRecorder::new(options.settings.clone(), &options.picam_dir);
            run_with(recorder, NoOpLighting::new(), options).await
        }
        (Backend::Picam, true) => {
            let recorder = PicamRecorder::new(options.settings.clone(), &options.picam_dir);
            run_with(recorder, BrightPiLighting::new(), options).await
        }
        (Backend::Picamera, false) => {
            let recorder = RaspividRecorder::new(options.settings.clone(), &options.data_dir);
            run_with(recorder, NoOpLighting::new(), options).await
        }
        (Backend::Picamera, true) => {
            let recorder = RaspividRecorder::new(options.settings.clone(), &options.data_dir);
            run_with(recorder, BrightPiLighting::new(), options).await
        }
    }
}

async fn run_with<R, L>(recorder: R, lighting: L, options: SessionOptions) -> ExitCode
where
    R: SegmentRecorder,
    L: Lighting,
{
    let presenter = Presenter::new();

    let use_case = RecordSessionUseCase::new(
        recorder,
        lighting,
        FfmpegTranscoder::new(),
        LocalSegmentStore::new(),
    );

    // SIGINT stops the session between batches
    let shutdown = ShutdownSignal::with_flag(use_case.stop_flag());
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let input = SessionInput {
        experiment_name: options.experiment_name,
        settings: options.settings,
        plan: options.plan,
        usb_dir: options.usb_dir,
    };

    let total_loops = input.plan.num_loops();
    let callbacks = SessionCallbacks {
        on_loop_start: Some(Box::new(move |current, _| {
            eprintln!("Recording loop {} / {}...", current, total_loops);
        })),
        on_segment_saved: Some(Box::new(|path| {
            eprintln!("Segment saved: {}", path.display());
        })),
        on_offload: Some(Box::new(|moved| {
            eprintln!("Offloaded {} files to USB", moved);
        })),
    };

    match use_case.execute(input, callbacks).await {
        Ok(output) => {
            let summary = presenter.format_summary(
                output.loops_completed,
                output.segments_recorded,
                output.mp4_files,
                output.offloaded,
            );
            if output.stopped_early {
                presenter.warn(&format!("Session stopped early: {}", summary));
            } else {
                presenter.success(&summary);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Convert leftover footage in a directory: remux segments to mp4, or
/// re-encode to grayscale.
pub async fn run_convert(
    dir: PathBuf,
    grayscale: bool,
    fps: Option<u32>,
    keep_original: bool,
) -> ExitCode {
    let mut presenter = Presenter::new();
    let store = LocalSegmentStore::new();
    let transcoder = FfmpegTranscoder::new();
    let remove_orig = !keep_original;

    presenter.start_spinner("Converting...");

    let mut converted = 0u64;
    for ext in ["ts", "h264"] {
        let files = match store.list(&dir, ext) {
            Ok(files) => files,
            Err(e) => {
                presenter.spinner_fail(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        };
        for file in files {
            presenter.update_spinner(&format!("Converting {}...", file.display()));
            let result = if grayscale {
                transcoder.to_grayscale(&file, remove_orig).await
            } else {
                // Raw h264 has no frame rate of its own
                let forced = if ext == "h264" { fps } else { None };
                transcoder.to_mp4(&file, forced, remove_orig).await
            };
            match result {
                Ok(_) => converted += 1,
                Err(e) => {
                    presenter.spinner_fail(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
    }

    presenter.spinner_success(&format!("Converted {} files", converted));
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    use crate::application::ports::ConfigStore;

    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults().merge(file_config).merge(cli_config)
}
