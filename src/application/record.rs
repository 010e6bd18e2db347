//! Record session use case

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::recording::{batch_name, CaptureSettings, SessionPlan, SEGMENTS_PER_LOOP};
use crate::domain::storage::OffloadPolicy;

use super::ports::{
    Lighting, LightingError, RecorderError, SegmentBatch, SegmentRecorder, SegmentStore,
    StorageError, TranscodeError, Transcoder,
};

/// Errors from the record session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Recording failed: {0}")]
    Recorder(#[from] RecorderError),

    #[error("Lighting control failed: {0}")]
    Lighting(#[from] LightingError),

    #[error("Conversion failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Input parameters for a recording session
#[derive(Debug, Clone)]
pub struct SessionInput {
    /// Name for the experimental run
    pub experiment_name: String,
    /// Camera parameters
    pub settings: CaptureSettings,
    /// Segment / session lengths
    pub plan: SessionPlan,
    /// USB stick mount point for offloading
    pub usb_dir: PathBuf,
}

/// Outcome of a recording session
#[derive(Debug, Clone, Default)]
pub struct SessionOutput {
    /// Recording loops fully completed
    pub loops_completed: u64,
    /// Segments the capture tool produced
    pub segments_recorded: u64,
    /// Segments remuxed to mp4
    pub mp4_files: u64,
    /// mp4 files moved to the USB stick
    pub offloaded: u64,
    /// Session ended before all loops ran (shutdown or disk space)
    pub stopped_early: bool,
}

/// Callbacks for progress updates
#[derive(Default)]
pub struct SessionCallbacks {
    /// Called at the start of each loop with (loop, total_loops)
    pub on_loop_start: Option<Box<dyn Fn(u64, u64) + Send + Sync>>,
    /// Called for each segment that landed on disk
    pub on_segment_saved: Option<Box<dyn Fn(&Path) + Send + Sync>>,
    /// Called after an offload with the number of files moved
    pub on_offload: Option<Box<dyn Fn(u64) + Send + Sync>>,
}

/// Orchestrates a recording session: per loop, switch the IR lights on,
/// record a batch of segments through the selected backend, remux the
/// footage to mp4, reset the lights and manage disk space.
pub struct RecordSessionUseCase<R, L, T, S>
where
    R: SegmentRecorder,
    L: Lighting,
    T: Transcoder,
    S: SegmentStore,
{
    recorder: R,
    lighting: L,
    transcoder: T,
    store: S,
    policy: OffloadPolicy,
    stop_flag: Arc<AtomicBool>,
}

impl<R, L, T, S> RecordSessionUseCase<R, L, T, S>
where
    R: SegmentRecorder,
    L: Lighting,
    T: Transcoder,
    S: SegmentStore,
{
    /// Create a new use case instance
    pub fn new(recorder: R, lighting: L, transcoder: T, store: S) -> Self {
        Self {
            recorder,
            lighting,
            transcoder,
            store,
            policy: OffloadPolicy::default(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the offload policy
    pub fn with_policy(mut self, policy: OffloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the stop flag for external signal handling
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    /// Execute the recording session
    pub async fn execute(
        &self,
        input: SessionInput,
        callbacks: SessionCallbacks,
    ) -> Result<SessionOutput, SessionError> {
        let mut output = SessionOutput::default();
        let total_loops = input.plan.num_loops();
        let data_dir = self.recorder.output_dir();
        let ext = self.recorder.format().extension();
        let forced_fps = self
            .recorder
            .format()
            .needs_forced_fps()
            .then_some(input.settings.fps);

        // Known-good lighting state before the first loop
        self.lighting.reset().await?;

        let mut space_on_usb = true;

        for loop_index in 0..total_loops {
            if self.stop_flag.load(Ordering::SeqCst) {
                info!("Shutdown requested, stopping before loop {}", loop_index + 1);
                output.stopped_early = true;
                break;
            }

            info!("Recording loop {} / {}", loop_index + 1, total_loops);
            if let Some(ref cb) = callbacks.on_loop_start {
                cb(loop_index + 1, total_loops);
            }

            self.lighting.ir_on().await?;

            let batch = SegmentBatch {
                batch_name: batch_name(loop_index, &input.experiment_name, &input.settings),
                segments: SEGMENTS_PER_LOOP,
                segment_secs: input.plan.segment_secs(),
            };
            let saved = self.recorder.record_batch(&batch).await?;
            output.segments_recorded += saved.len() as u64;
            for path in &saved {
                if let Some(ref cb) = callbacks.on_segment_saved {
                    cb(path);
                }
            }

            // Remux everything the backend left behind, not just this
            // batch, so leftovers from an interrupted run get picked up
            for file in self.store.list(&data_dir, ext)? {
                self.transcoder.to_mp4(&file, forced_fps, true).await?;
                output.mp4_files += 1;
            }

            self.lighting.reset().await?;

            let local = self.store.disk_usage(&data_dir)?;
            info!(
                "Filesystem usage {:.0}gb / {:.0}gb",
                local.used_gb(),
                local.total_gb()
            );

            if self.policy.should_offload(local) && space_on_usb {
                let usb = self.store.disk_usage(&input.usb_dir)?;
                info!(
                    "USB usage {:.0}gb / {:.0}gb",
                    usb.used_gb(),
                    usb.total_gb()
                );
                if self.policy.usb_would_overflow(local, usb) {
                    space_on_usb = false;
                    warn!("USB space would be exceeded, offload cancelled");
                    output.stopped_early = true;
                    break;
                }
                let moved = self
                    .store
                    .offload(&data_dir, &input.usb_dir, "mp4")
                    .await?;
                info!("Moved {} mp4 files to {}", moved, input.usb_dir.display());
                output.offloaded += moved;
                if let Some(ref cb) = callbacks.on_offload {
                    cb(moved);
                }
            }

            output.loops_completed += 1;

            let local = self.store.disk_usage(&data_dir)?;
            if self.policy.should_stop(local) {
                warn!(
                    "Terminating after loop {} due to disk space",
                    loop_index + 1
                );
                output.stopped_early = true;
                break;
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SegmentFormat;
    use crate::domain::storage::{DiskUsage, BYTES_PER_GB};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU64;

    fn gb(n: f64) -> u64 {
        (n * BYTES_PER_GB as f64) as u64
    }

    fn usage(total: f64, used: f64) -> DiskUsage {
        DiskUsage {
            total: gb(total),
            used: gb(used),
            free: gb(total - used),
        }
    }

    struct MockRecorder {
        format: SegmentFormat,
        batches: AtomicU64,
    }

    impl MockRecorder {
        fn new(format: SegmentFormat) -> Self {
            Self {
                format,
                batches: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl SegmentRecorder for MockRecorder {
        async fn record_batch(&self, batch: &SegmentBatch) -> Result<Vec<PathBuf>, RecorderError> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            Ok((0..batch.segments)
                .map(|i| PathBuf::from(format!("/data/{}-{}.ts", batch.batch_name, i)))
                .collect())
        }

        fn output_dir(&self) -> PathBuf {
            PathBuf::from("/data")
        }

        fn format(&self) -> SegmentFormat {
            self.format
        }
    }

    #[derive(Default)]
    struct MockLighting {
        on_calls: AtomicU64,
        reset_calls: AtomicU64,
    }

    #[async_trait]
    impl Lighting for &MockLighting {
        async fn ir_on(&self) -> Result<(), LightingError> {
            self.on_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn reset(&self) -> Result<(), LightingError> {
            self.reset_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockTranscoder {
        calls: AtomicU64,
        last_fps: std::sync::Mutex<Option<u32>>,
    }

    #[async_trait]
    impl Transcoder for &MockTranscoder {
        async fn to_mp4(
            &self,
            input: &Path,
            fps: Option<u32>,
            _remove_orig: bool,
        ) -> Result<PathBuf, TranscodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_fps.lock().unwrap() = fps;
            Ok(input.with_extension("mp4"))
        }

        async fn to_grayscale(
            &self,
            input: &Path,
            _remove_orig: bool,
        ) -> Result<PathBuf, TranscodeError> {
            Ok(input.to_path_buf())
        }
    }

    struct MockStore {
        local: DiskUsage,
        usb: DiskUsage,
        offloads: AtomicU64,
    }

    impl MockStore {
        fn new(local: DiskUsage, usb: DiskUsage) -> Self {
            Self {
                local,
                usb,
                offloads: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl SegmentStore for &MockStore {
        fn disk_usage(&self, path: &Path) -> Result<DiskUsage, StorageError> {
            if path.starts_with("/usb") {
                Ok(self.usb)
            } else {
                Ok(self.local)
            }
        }

        fn list(&self, _dir: &Path, _ext: &str) -> Result<Vec<PathBuf>, StorageError> {
            Ok(vec![PathBuf::from("/data/a.ts"), PathBuf::from("/data/b.ts")])
        }

        async fn offload(
            &self,
            _data_dir: &Path,
            _usb_dir: &Path,
            _ext: &str,
        ) -> Result<u64, StorageError> {
            self.offloads.fetch_add(1, Ordering::SeqCst);
            Ok(3)
        }
    }

    fn input(segment: u64, session: u64) -> SessionInput {
        SessionInput {
            experiment_name: "test".to_string(),
            settings: CaptureSettings::default(),
            plan: SessionPlan::new(segment, session).unwrap(),
            usb_dir: PathBuf::from("/usb"),
        }
    }

    #[tokio::test]
    async fn records_all_loops_with_lighting() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        // 1200s at 120s segments -> 2 loops
        let store = MockStore::new(usage(32.0, 2.0), usage(64.0, 1.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        let output = use_case
            .execute(input(120, 1200), SessionCallbacks::default())
            .await
            .unwrap();

        assert_eq!(output.loops_completed, 2);
        assert_eq!(output.segments_recorded, 10);
        assert!(!output.stopped_early);
        assert_eq!(lighting.on_calls.load(Ordering::SeqCst), 2);
        // Initial reset plus one per loop
        assert_eq!(lighting.reset_calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.offloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn forces_fps_for_h264() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        let store = MockStore::new(usage(32.0, 2.0), usage(64.0, 1.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::H264),
            &lighting,
            &transcoder,
            &store,
        );

        use_case
            .execute(input(120, 400), SessionCallbacks::default())
            .await
            .unwrap();

        assert_eq!(*transcoder.last_fps.lock().unwrap(), Some(60));
    }

    #[tokio::test]
    async fn no_forced_fps_for_mpegts() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        let store = MockStore::new(usage(32.0, 2.0), usage(64.0, 1.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        use_case
            .execute(input(120, 400), SessionCallbacks::default())
            .await
            .unwrap();

        assert!(transcoder.calls.load(Ordering::SeqCst) > 0);
        assert_eq!(*transcoder.last_fps.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn offloads_when_local_usage_is_high() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        let store = MockStore::new(usage(32.0, 9.0), usage(64.0, 10.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        let output = use_case
            .execute(input(120, 400), SessionCallbacks::default())
            .await
            .unwrap();

        assert_eq!(store.offloads.load(Ordering::SeqCst), 1);
        assert_eq!(output.offloaded, 3);
        assert!(!output.stopped_early);
    }

    #[tokio::test]
    async fn stops_when_usb_would_overflow() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        // Local has 9gb accumulated, USB only 5gb free
        let store = MockStore::new(usage(32.0, 9.0), usage(64.0, 59.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        let output = use_case
            .execute(input(120, 1200), SessionCallbacks::default())
            .await
            .unwrap();

        assert_eq!(store.offloads.load(Ordering::SeqCst), 0);
        assert!(output.stopped_early);
        assert_eq!(output.loops_completed, 0);
    }

    #[tokio::test]
    async fn stops_when_spare_floor_reached() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        // 27gb of 32gb used: under the offload path the USB absorbs it,
        // but less than 6gb spare remains locally
        let store = MockStore::new(usage(32.0, 27.0), usage(64.0, 1.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        let output = use_case
            .execute(input(120, 1200), SessionCallbacks::default())
            .await
            .unwrap();

        assert_eq!(output.loops_completed, 1);
        assert!(output.stopped_early);
    }

    #[tokio::test]
    async fn stop_flag_ends_session_between_loops() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        let store = MockStore::new(usage(32.0, 2.0), usage(64.0, 1.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        use_case.stop_flag().store(true, Ordering::SeqCst);

        let output = use_case
            .execute(input(120, 1200), SessionCallbacks::default())
            .await
            .unwrap();

        assert_eq!(output.loops_completed, 0);
        assert_eq!(output.segments_recorded, 0);
        assert!(output.stopped_early);
    }

    #[tokio::test]
    async fn callbacks_fire() {
        let lighting = MockLighting::default();
        let transcoder = MockTranscoder::default();
        let store = MockStore::new(usage(32.0, 2.0), usage(64.0, 1.0));
        let use_case = RecordSessionUseCase::new(
            MockRecorder::new(SegmentFormat::MpegTs),
            &lighting,
            &transcoder,
            &store,
        );

        let loops = Arc::new(AtomicU64::new(0));
        let segments = Arc::new(AtomicU64::new(0));
        let loops_cb = Arc::clone(&loops);
        let segments_cb = Arc::clone(&segments);

        let callbacks = SessionCallbacks {
            on_loop_start: Some(Box::new(move |_, _| {
                loops_cb.fetch_add(1, Ordering::SeqCst);
            })),
            on_segment_saved: Some(Box::new(move |_| {
                segments_cb.fetch_add(1, Ordering::SeqCst);
            })),
            on_offload: None,
        };

        use_case.execute(input(120, 400), callbacks).await.unwrap();

        assert_eq!(loops.load(Ordering::SeqCst), 1);
        assert_eq!(segments.load(Ordering::SeqCst), 5);
    }
}
