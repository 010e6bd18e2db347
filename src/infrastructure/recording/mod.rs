//! Capture backend adapters

pub mod picam;
pub mod raspivid;

pub use picam::PicamRecorder;
pub use raspivid::RaspividRecorder;

use std::time::Duration;

/// Camera warmup before the first segment of a batch
pub(crate) const WARMUP: Duration = Duration::from_secs(5);
