//! Lighting adapters

pub mod brightpi;
pub mod noop;

pub use brightpi::BrightPiLighting;
pub use noop::NoOpLighting;
