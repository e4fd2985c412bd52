//! Runtime configuration for the gate monitor.
//!
//! These are the structs the core works with. They are separate from the
//! TOML-deserialized config in `gatekeeper_config`; see `conversions`.

use std::time::Duration;

use crate::util::{MILLIS_PER_SEC, div_ceil_u64};

/// Debounce and alarm parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorCfg {
    /// A sample at or below this distance counts as "open".
    pub threshold_mm: u16,
    /// Window size: samples that must agree before the stable state flips.
    pub slot_count: usize,
    /// Fixed sampling period.
    pub interval: Duration,
    /// Minimum continuous open time before the long-open alarm fires.
    pub long_open: Duration,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self {
            threshold_mm: 200,
            slot_count: 5,
            interval: Duration::from_secs(2),
            long_open: Duration::from_secs(300),
        }
    }
}

impl MonitorCfg {
    /// Length of one full window cycle (`slot_count` periods).
    pub fn cycle(&self) -> Duration {
        let n = u32::try_from(self.slot_count).unwrap_or(u32::MAX);
        self.interval.saturating_mul(n)
    }

    /// Unanimous-open cycles needed before the long-open alarm fires.
    ///
    /// Rounded up, so a duration that is not a whole number of cycles fires
    /// on the first cycle that reaches or passes it. Never less than 1.
    pub fn long_open_cycles(&self) -> u32 {
        let cycle_ms = u64::try_from(self.cycle().as_millis()).unwrap_or(u64::MAX);
        let want_ms = u64::try_from(self.long_open.as_millis()).unwrap_or(u64::MAX);
        let n = div_ceil_u64(want_ms, cycle_ms).max(1);
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Reject parameters the monitor cannot run with.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.threshold_mm == 0 {
            return Err("threshold_mm must be > 0");
        }
        if self.slot_count == 0 {
            return Err("slot_count must be >= 1");
        }
        if self.interval.is_zero() {
            return Err("sampling interval must be > 0");
        }
        if self.long_open.is_zero() {
            return Err("long-open duration must be > 0");
        }
        Ok(())
    }

    /// Long-open duration in whole seconds (for alarm text).
    pub fn long_open_secs(&self) -> u64 {
        let ms = u64::try_from(self.long_open.as_millis()).unwrap_or(u64::MAX);
        ms / MILLIS_PER_SEC
    }
}

/// Timeouts applied at the I/O edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// Per-read sensor timeout.
    pub sensor: Duration,
    /// Per-request notification timeout (enforced by the transport).
    pub notify: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            sensor: Duration::from_millis(100),
            notify: Duration::from_secs(5),
        }
    }
}
