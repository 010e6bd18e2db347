//! Lighting port interface

use async_trait::async_trait;
use thiserror::Error;

/// Lighting errors
#[derive(Debug, Clone, Error)]
pub enum LightingError {
    #[error("i2cset not found (install i2c-tools)")]
    I2csetNotFound,

    #[error("Failed to switch lighting: {0}")]
    SwitchFailed(String),
}

/// Port for the infrared lighting accessory
#[async_trait]
pub trait Lighting: Send + Sync {
    /// Switch the IR LED bank on
    async fn ir_on(&self) -> Result<(), LightingError>;

    /// Reset the accessory: all LEDs off, default gain
    async fn reset(&self) -> Result<(), LightingError>;
}
