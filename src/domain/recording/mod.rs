//! Recording domain: capture settings, session planning, segment naming

pub mod plan;
pub mod segment;
pub mod settings;

pub use plan::{SessionPlan, SEGMENTS_PER_LOOP};
pub use segment::{batch_name, default_experiment_name, segment_filename};
pub use settings::{Backend, CaptureSettings};
