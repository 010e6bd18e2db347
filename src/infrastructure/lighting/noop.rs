//! No-op lighting adapter, used when recording without IR

use async_trait::async_trait;

use crate::application::ports::{Lighting, LightingError};

/// Lighting adapter that does nothing
pub struct NoOpLighting;

impl NoOpLighting {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpLighting {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Lighting for NoOpLighting {
    async fn ir_on(&self) -> Result<(), LightingError> {
        Ok(())
    }

    async fn reset(&self) -> Result<(), LightingError> {
        Ok(())
    }
}
