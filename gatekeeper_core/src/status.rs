//! Result of one daemon tick.

use crate::error::GateError;
use crate::monitor::StepOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// A sample was read and fed to the monitor.
    Sampled {
        distance_mm: u16,
        outcome: StepOutcome,
        /// Messages accepted by the dispatcher for this sample.
        queued: usize,
    },
    /// The sensor read failed; the sample was skipped and monitor state is untouched.
    SensorFailed(GateError),
}
