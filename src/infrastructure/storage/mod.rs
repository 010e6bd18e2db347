//! Storage adapters

pub mod local;

pub use local::LocalSegmentStore;
