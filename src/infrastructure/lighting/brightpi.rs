//! BrightPi lighting adapter
//!
//! The BrightPi sits on I2C bus 1 at address 0x70. Register 0x00 is the
//! LED on/off bitmask (bits 0-3 white, bits 4-7 infrared), register 0x09
//! holds the gain. Registers are written through i2cset from i2c-tools,
//! which is preinstalled on Raspberry Pi OS.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{Lighting, LightingError};

const I2C_BUS: &str = "1";
const ADDRESS: &str = "0x70";
const LED_REGISTER: &str = "0x00";
const GAIN_REGISTER: &str = "0x09";
const DEFAULT_GAIN: &str = "0x08";
/// LEDs 5-8, the infrared bank
const IR_BANK: &str = "0xf0";
const ALL_OFF: &str = "0x00";

/// BrightPi IR lighting control
pub struct BrightPiLighting;

impl BrightPiLighting {
    /// Create a new BrightPi adapter
    pub fn new() -> Self {
        Self
    }

    async fn write_register(register: &str, value: &str) -> Result<(), LightingError> {
        debug!("i2cset {} {} = {}", ADDRESS, register, value);
        let status = Command::new("i2cset")
            .args(["-y", I2C_BUS, ADDRESS, register, value])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LightingError::I2csetNotFound
                } else {
                    LightingError::SwitchFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(LightingError::SwitchFailed(format!(
                "i2cset exited with status: {}",
                status
            )));
        }
        Ok(())
    }
}

impl Default for BrightPiLighting {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Lighting for BrightPiLighting {
    async fn ir_on(&self) -> Result<(), LightingError> {
        Self::write_register(LED_REGISTER, IR_BANK).await
    }

    async fn reset(&self) -> Result<(), LightingError> {
        Self::write_register(LED_REGISTER, ALL_OFF).await?;
        Self::write_register(GAIN_REGISTER, DEFAULT_GAIN).await
    }
}
