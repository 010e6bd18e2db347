//! Segment and batch naming
//!
//! The naming convention matches what the capture tools leave on disk:
//! `{yymmdd-HHMMSS}-sid{index}-{batch}.{ext}` where the batch part encodes
//! the loop, experiment name and run details.

use chrono::Local;

use super::settings::CaptureSettings;

/// Default experiment name: the session start timestamp
pub fn default_experiment_name() -> String {
    Local::now().format("%Y%m%d-%H%M").to_string()
}

/// Name shared by all segments of one recording loop,
/// e.g. "iter0-hive3-60fps-640x480"
pub fn batch_name(loop_index: u64, experiment_name: &str, settings: &CaptureSettings) -> String {
    format!(
        "iter{}-{}-{}",
        loop_index,
        experiment_name,
        settings.run_details()
    )
}

/// File name for one segment of a batch,
/// e.g. "240830-153012-sid2-iter0-hive3-60fps-640x480.ts"
pub fn segment_filename(segment_index: u64, batch: &str, ext: &str) -> String {
    format!(
        "{}-sid{}-{}.{}",
        Local::now().format("%y%m%d-%H%M%S"),
        segment_index,
        batch,
        ext
    )
}
