//! Config store and merge precedence tests

use std::path::PathBuf;

use beepi::application::ports::ConfigStore;
use beepi::domain::config::{AppConfig, PathsConfig};
use beepi::infrastructure::XdgConfigStore;

fn store_in_tempdir() -> (tempfile::TempDir, XdgConfigStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
    (dir, store)
}

#[tokio::test]
async fn load_missing_file_yields_empty_config() {
    let (_dir, store) = store_in_tempdir();
    let config = store.load().await.unwrap();
    assert!(config.fps.is_none());
    assert!(config.paths.is_none());
}

#[tokio::test]
async fn save_and_load_round_trip() {
    let (_dir, store) = store_in_tempdir();
    let config = AppConfig {
        fps: Some(40),
        width: Some(1640),
        height: Some(922),
        use_picamera: Some(true),
        paths: Some(PathsConfig {
            usb_dir: Some(PathBuf::from("/mnt/usb")),
            ..Default::default()
        }),
        ..Default::default()
    };

    store.save(&config).await.unwrap();
    let loaded = store.load().await.unwrap();

    assert_eq!(loaded.fps, Some(40));
    assert_eq!(loaded.width, Some(1640));
    assert_eq!(loaded.height, Some(922));
    assert_eq!(loaded.use_picamera, Some(true));
    assert_eq!(loaded.usb_dir_or_default(), PathBuf::from("/mnt/usb"));
}

#[tokio::test]
async fn init_writes_defaults_once() {
    let (_dir, store) = store_in_tempdir();
    store.init().await.unwrap();
    assert!(store.exists());

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.fps, Some(60));
    assert_eq!(loaded.segment_length, Some(120));

    // Second init must not clobber the existing file
    assert!(store.init().await.is_err());
}

#[tokio::test]
async fn file_overrides_defaults_cli_overrides_file() {
    let (_dir, store) = store_in_tempdir();
    store
        .save(&AppConfig {
            fps: Some(30),
            width: Some(1280),
            ..Default::default()
        })
        .await
        .unwrap();

    let file_config = store.load().await.unwrap();
    let cli_config = AppConfig {
        fps: Some(90),
        ..Default::default()
    };

    let merged = AppConfig::defaults().merge(file_config).merge(cli_config);

    // CLI wins over file
    assert_eq!(merged.fps_or_default(), 90);
    // File wins over defaults
    assert_eq!(merged.width_or_default(), 1280);
    // Defaults fill the rest
    assert_eq!(merged.height_or_default(), 480);
    assert_eq!(merged.session_length_or_default(), 400);
}
