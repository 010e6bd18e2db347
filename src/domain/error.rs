//! Domain error types

use thiserror::Error;

/// Error when a session plan violates the segment/session relationship
#[derive(Debug, Clone, Error)]
#[error("Invalid session plan: segment length ({segment_secs}s) must be shorter than session length ({session_secs}s)")]
pub struct SessionPlanError {
    pub segment_secs: u64,
    pub session_secs: u64,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
