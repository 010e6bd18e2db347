//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::plan::{DEFAULT_SEGMENT_SECS, DEFAULT_SESSION_SECS};
use crate::domain::recording::settings::{
    DEFAULT_CAMERA_MODE, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

/// Default picam install directory (binary, hooks/ and archive/ live here)
pub const DEFAULT_PICAM_DIR: &str = "/home/pi/picam";

/// Default local directory for raspivid footage
pub const DEFAULT_DATA_DIR: &str = "/home/pi/picamera_data";

/// Default USB stick mount point
pub const DEFAULT_USB_DIR: &str = "/home/pi/usbstick";

/// Filesystem locations of the capture tooling and footage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub picam_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub usb_dir: Option<PathBuf>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub fps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub camera_mode: Option<u32>,
    pub segment_length: Option<u64>,
    pub session_length: Option<u64>,
    pub ir: Option<bool>,
    pub use_picamera: Option<bool>,
    pub paths: Option<PathsConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            fps: Some(DEFAULT_FPS),
            width: Some(DEFAULT_WIDTH),
            height: Some(DEFAULT_HEIGHT),
            camera_mode: Some(DEFAULT_CAMERA_MODE),
            segment_length: Some(DEFAULT_SEGMENT_SECS),
            session_length: Some(DEFAULT_SESSION_SECS),
            ir: Some(false),
            use_picamera: Some(false),
            paths: Some(PathsConfig {
                picam_dir: Some(PathBuf::from(DEFAULT_PICAM_DIR)),
                data_dir: Some(PathBuf::from(DEFAULT_DATA_DIR)),
                usb_dir: Some(PathBuf::from(DEFAULT_USB_DIR)),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            fps: other.fps.or(self.fps),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            camera_mode: other.camera_mode.or(self.camera_mode),
            segment_length: other.segment_length.or(self.segment_length),
            session_length: other.session_length.or(self.session_length),
            ir: other.ir.or(self.ir),
            use_picamera: other.use_picamera.or(self.use_picamera),
            paths: Self::merge_paths(self.paths, other.paths),
        }
    }

    fn merge_paths(base: Option<PathsConfig>, other: Option<PathsConfig>) -> Option<PathsConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(PathsConfig {
                picam_dir: o.picam_dir.or(b.picam_dir),
                data_dir: o.data_dir.or(b.data_dir),
                usb_dir: o.usb_dir.or(b.usb_dir),
            }),
        }
    }

    pub fn fps_or_default(&self) -> u32 {
        self.fps.unwrap_or(DEFAULT_FPS)
    }

    pub fn width_or_default(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn height_or_default(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    pub fn camera_mode_or_default(&self) -> u32 {
        self.camera_mode.unwrap_or(DEFAULT_CAMERA_MODE)
    }

    pub fn segment_length_or_default(&self) -> u64 {
        self.segment_length.unwrap_or(DEFAULT_SEGMENT_SECS)
    }

    pub fn session_length_or_default(&self) -> u64 {
        self.session_length.unwrap_or(DEFAULT_SESSION_SECS)
    }

    pub fn ir_or_default(&self) -> bool {
        self.ir.unwrap_or(false)
    }

    pub fn use_picamera_or_default(&self) -> bool {
        self.use_picamera.unwrap_or(false)
    }

    pub fn picam_dir_or_default(&self) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(|p| p.picam_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PICAM_DIR))
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(|p| p.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn usb_dir_or_default(&self) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(|p| p.usb_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_USB_DIR))
    }
}
