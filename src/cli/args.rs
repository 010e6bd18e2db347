//! CLI argument definitions using Clap
//!
//! Long flag names keep their historical underscore spelling
//! (`--experiment_name`, not `--experiment-name`) so existing cron
//! entries on the hive rigs keep working.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BeePi - honeybee hive footage recorder
#[derive(Parser, Debug)]
#[command(name = "beepi")]
#[command(version)]
#[command(about = "Record hive footage in segments via picam or picamera-style capture")]
#[command(long_about = None)]
pub struct Cli {
    /// Name for the experimental run (defaults to the start timestamp)
    #[arg(long = "experiment_name", value_name = "NAME")]
    pub experiment_name: Option<String>,

    /// Frames per second to record in
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Width of video in pixels
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Height of video in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Raspberry Pi camera mode. Warning: picam modes seem to be
    /// shifted by one relative to picamera modes
    #[arg(long = "camera_mode", value_name = "MODE")]
    pub camera_mode: Option<u32>,

    /// Length of an individual video segment (in seconds)
    #[arg(long = "segment_length", value_name = "SECS")]
    pub segment_length: Option<u64>,

    /// Desired length of resulting footage (in seconds),
    /// e.g. 21600 for 6hrs, 86400 for 24hrs
    #[arg(long = "session_length", value_name = "SECS")]
    pub session_length: Option<u64>,

    /// Use infrared lighting when recording
    #[arg(long)]
    pub ir: bool,

    /// Run a small preconfigured test
    #[arg(long)]
    pub debug: bool,

    /// Use picamera-style pure video capture instead of picam
    #[arg(long = "use_picamera")]
    pub use_picamera: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Convert leftover footage in a directory
    Convert {
        /// Directory containing the footage
        dir: PathBuf,

        /// Re-encode to grayscale instead of remuxing to mp4
        #[arg(long)]
        grayscale: bool,

        /// Frame rate to force for raw .h264 input
        #[arg(long, value_name = "FPS")]
        fps: Option<u32>,

        /// Keep the original files after conversion
        #[arg(long = "keep_original")]
        keep_original: bool,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "fps",
    "width",
    "height",
    "camera_mode",
    "segment_length",
    "session_length",
    "ir",
    "use_picamera",
    "paths.picam_dir",
    "paths.data_dir",
    "paths.usb_dir",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["beepi"]);
        assert!(cli.experiment_name.is_none());
        assert!(cli.fps.is_none());
        assert!(cli.width.is_none());
        assert!(cli.height.is_none());
        assert!(cli.camera_mode.is_none());
        assert!(cli.segment_length.is_none());
        assert!(cli.session_length.is_none());
        assert!(!cli.ir);
        assert!(!cli.debug);
        assert!(!cli.use_picamera);
    }

    #[test]
    fn cli_parses_underscore_flags() {
        let cli = Cli::parse_from([
            "beepi",
            "--experiment_name",
            "hive3",
            "--camera_mode",
            "5",
            "--segment_length",
            "60",
            "--session_length",
            "21600",
        ]);
        assert_eq!(cli.experiment_name, Some("hive3".to_string()));
        assert_eq!(cli.camera_mode, Some(5));
        assert_eq!(cli.segment_length, Some(60));
        assert_eq!(cli.session_length, Some(21_600));
    }

    #[test]
    fn cli_parses_resolution_and_fps() {
        let cli = Cli::parse_from(["beepi", "--fps", "40", "--width", "1640", "--height", "922"]);
        assert_eq!(cli.fps, Some(40));
        assert_eq!(cli.width, Some(1640));
        assert_eq!(cli.height, Some(922));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["beepi", "--ir", "--debug", "--use_picamera"]);
        assert!(cli.ir);
        assert!(cli.debug);
        assert!(cli.use_picamera);
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["beepi", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["beepi", "config", "set", "fps", "40"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "fps");
            assert_eq!(value, "40");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_parses_convert() {
        let cli = Cli::parse_from(["beepi", "convert", "/data", "--grayscale", "--keep_original"]);
        if let Some(Commands::Convert {
            dir,
            grayscale,
            fps,
            keep_original,
        }) = cli.command
        {
            assert_eq!(dir, PathBuf::from("/data"));
            assert!(grayscale);
            assert!(fps.is_none());
            assert!(keep_original);
        } else {
            panic!("Expected Convert command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("fps"));
        assert!(is_valid_config_key("segment_length"));
        assert!(is_valid_config_key("paths.usb_dir"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
