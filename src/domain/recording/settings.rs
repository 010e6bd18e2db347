//! Capture settings value object

use std::fmt;

/// Default frame rate
pub const DEFAULT_FPS: u32 = 60;

/// Default video width in pixels
pub const DEFAULT_WIDTH: u32 = 640;

/// Default video height in pixels
pub const DEFAULT_HEIGHT: u32 = 480;

/// Default sensor mode (high fps mode for picam; picam modes are shifted
/// by one relative to picamera modes)
pub const DEFAULT_CAMERA_MODE: u32 = 6;

/// Fixed ISO used for hive footage
pub const FIXED_ISO: u32 = 800;

/// Fixed white balance profile. Greyworld corrects the colour cast
/// introduced by removing the IR filter from the camera module.
pub const AWB_GREYWORLD: &str = "greyworld";

/// Capture backend selector.
/// `Picam` shells out to the picam daemon (audio from a USB microphone,
/// `.ts` segments); `Picamera` drives raspivid for pure video (`.h264`),
/// usable at higher resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Picam,
    Picamera,
}

impl Backend {
    /// Map the `--use_picamera` flag onto a backend
    pub const fn from_flag(use_picamera: bool) -> Self {
        if use_picamera {
            Self::Picamera
        } else {
            Self::Picam
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Picam => write!(f, "picam"),
            Self::Picamera => write!(f, "picamera"),
        }
    }
}

/// Camera parameters forwarded to the external capture tool.
/// ISO, white balance and image flips are fixed for the hive rig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub camera_mode: u32,
    pub iso: u32,
    pub hflip: bool,
    pub vflip: bool,
}

impl CaptureSettings {
    /// Create settings with the fixed rig parameters applied
    pub const fn new(fps: u32, width: u32, height: u32, camera_mode: u32) -> Self {
        Self {
            fps,
            width,
            height,
            camera_mode,
            iso: FIXED_ISO,
            hflip: true,
            vflip: true,
        }
    }

    /// Short run descriptor embedded in segment names, e.g. "60fps-640x480"
    pub fn run_details(&self) -> String {
        format!("{}fps-{}x{}", self.fps, self.width, self.height)
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self::new(DEFAULT_FPS, DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_CAMERA_MODE)
    }
}
