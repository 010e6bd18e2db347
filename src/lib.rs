//! BeePi - honeybee hive footage recorder
//!
//! This crate records hive footage on a Raspberry Pi by driving one of
//! two external capture tools (the picam daemon, or raspivid for pure
//! video) in fixed-length segments, remuxing the result to mp4 and
//! offloading it to a USB stick as local disk space fills up.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Capture settings, session planning, segment naming,
//!   disk policy, configuration value objects
//! - **Application**: The record session use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (picam, raspivid, ffmpeg,
//!   BrightPi lighting, filesystem storage, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
