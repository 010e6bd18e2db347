//! Config command handler

use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::PathsConfig;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let mut config = store.load().await?;

    match key {
        "fps" => config.fps = Some(parse_u32(key, value)?),
        "width" => config.width = Some(parse_u32(key, value)?),
        "height" => config.height = Some(parse_u32(key, value)?),
        "camera_mode" => config.camera_mode = Some(parse_u32(key, value)?),
        "segment_length" => config.segment_length = Some(parse_u64(key, value)?),
        "session_length" => config.session_length = Some(parse_u64(key, value)?),
        "ir" => config.ir = Some(parse_bool(key, value)?),
        "use_picamera" => config.use_picamera = Some(parse_bool(key, value)?),
        "paths.picam_dir" => {
            paths_mut(&mut config.paths).picam_dir = Some(PathBuf::from(value));
        }
        "paths.data_dir" => {
            paths_mut(&mut config.paths).data_dir = Some(PathBuf::from(value));
        }
        "paths.usb_dir" => {
            paths_mut(&mut config.paths).usb_dir = Some(PathBuf::from(value));
        }
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;
    let value = lookup(&config, key);
    match value {
        Some(v) => presenter.output(&v),
        None => presenter.info(&format!("{} is not set", key)),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        let value = lookup(&config, key).unwrap_or_else(|| "(not set)".to_string());
        presenter.key_value(key, &value);
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn paths_mut(paths: &mut Option<PathsConfig>) -> &mut PathsConfig {
    paths.get_or_insert_with(PathsConfig::default)
}

fn lookup(config: &crate::domain::config::AppConfig, key: &str) -> Option<String> {
    match key {
        "fps" => config.fps.map(|v| v.to_string()),
        "width" => config.width.map(|v| v.to_string()),
        "height" => config.height.map(|v| v.to_string()),
        "camera_mode" => config.camera_mode.map(|v| v.to_string()),
        "segment_length" => config.segment_length.map(|v| v.to_string()),
        "session_length" => config.session_length.map(|v| v.to_string()),
        "ir" => config.ir.map(|v| v.to_string()),
        "use_picamera" => config.use_picamera.map(|v| v.to_string()),
        "paths.picam_dir" => config
            .paths
            .as_ref()
            .and_then(|p| p.picam_dir.as_ref())
            .map(|v| v.display().to_string()),
        "paths.data_dir" => config
            .paths
            .as_ref()
            .and_then(|p| p.data_dir.as_ref())
            .map(|v| v.display().to_string()),
        "paths.usb_dir" => config
            .paths
            .as_ref()
            .and_then(|p| p.usb_dir.as_ref())
            .map(|v| v.display().to_string()),
        _ => None,
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a positive integer".to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a positive integer".to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        }),
    }
}
