//! Transcoding adapters

pub mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;
