//! Session plan value object

use crate::domain::error::SessionPlanError;

/// Default length of a single video segment in seconds
pub const DEFAULT_SEGMENT_SECS: u64 = 120;

/// Default length of a recording session in seconds
pub const DEFAULT_SESSION_SECS: u64 = 400;

/// Segments recorded per loop before footage is remuxed and disk
/// space is re-checked
pub const SEGMENTS_PER_LOOP: u64 = 5;

/// Debug segment length in seconds
pub const DEBUG_SEGMENT_SECS: u64 = 3;

/// Debug session length in seconds
pub const DEBUG_SESSION_SECS: u64 = 7;

/// Plan for one recording session: how long each segment runs and how
/// much total footage is wanted. Validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    segment_secs: u64,
    session_secs: u64,
}

impl SessionPlan {
    /// Create a session plan.
    ///
    /// # Errors
    /// Returns `SessionPlanError` unless `segment_secs < session_secs`.
    pub fn new(segment_secs: u64, session_secs: u64) -> Result<Self, SessionPlanError> {
        if segment_secs == 0 || segment_secs >= session_secs {
            return Err(SessionPlanError {
                segment_secs,
                session_secs,
            });
        }
        Ok(Self {
            segment_secs,
            session_secs,
        })
    }

    /// The preconfigured smoke-test plan used by `--debug`
    pub fn debug_plan() -> Self {
        Self {
            segment_secs: DEBUG_SEGMENT_SECS,
            session_secs: DEBUG_SESSION_SECS,
        }
    }

    pub const fn segment_secs(&self) -> u64 {
        self.segment_secs
    }

    pub const fn session_secs(&self) -> u64 {
        self.session_secs
    }

    /// Number of recording loops needed to cover the session,
    /// at `SEGMENTS_PER_LOOP` segments per loop. At least one.
    pub const fn num_loops(&self) -> u64 {
        let per_loop = SEGMENTS_PER_LOOP * self.segment_secs;
        let loops = self.session_secs.div_ceil(per_loop);
        if loops == 0 {
            1
        } else {
            loops
        }
    }
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            segment_secs: DEFAULT_SEGMENT_SECS,
            session_secs: DEFAULT_SESSION_SECS,
        }
    }
}
