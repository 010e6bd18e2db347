//! Disk usage value object and offload policy

pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Try to offload to the USB stick after accumulating this many GB locally
pub const OFFLOAD_AFTER_GB: f64 = 8.0;

/// Stop the session once less than this many GB remain on the filesystem
pub const LEAVE_SPARE_GB: f64 = 6.0;

/// Snapshot of a filesystem's capacity in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl DiskUsage {
    pub fn total_gb(&self) -> f64 {
        self.total as f64 / BYTES_PER_GB as f64
    }

    pub fn used_gb(&self) -> f64 {
        self.used as f64 / BYTES_PER_GB as f64
    }

    pub fn free_gb(&self) -> f64 {
        self.free as f64 / BYTES_PER_GB as f64
    }
}

/// Decides when footage is moved to the USB stick and when the session
/// must stop to leave headroom on the recording filesystem.
#[derive(Debug, Clone, Copy)]
pub struct OffloadPolicy {
    offload_after_gb: f64,
    leave_spare_gb: f64,
}

impl OffloadPolicy {
    pub fn new(offload_after_gb: f64, leave_spare_gb: f64) -> Self {
        Self {
            offload_after_gb,
            leave_spare_gb,
        }
    }

    /// Local usage is high enough to move footage to the USB stick
    pub fn should_offload(&self, local: DiskUsage) -> bool {
        local.used_gb() > self.offload_after_gb
    }

    /// The USB stick cannot absorb the locally accumulated footage
    pub fn usb_would_overflow(&self, local: DiskUsage, usb: DiskUsage) -> bool {
        local.used_gb() > usb.free_gb()
    }

    /// Remaining local space has dropped below the spare floor
    pub fn should_stop(&self, local: DiskUsage) -> bool {
        (local.total_gb() - local.used_gb()) < self.leave_spare_gb
    }
}

impl Default for OffloadPolicy {
    fn default() -> Self {
        Self::new(OFFLOAD_AFTER_GB, LEAVE_SPARE_GB)
    }
}
