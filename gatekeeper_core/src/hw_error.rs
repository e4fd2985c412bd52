//! Maps `Box<dyn Error>` from trait boundaries to typed `GateError`.
//!
//! The traits in `gatekeeper_traits` use `Box<dyn Error + Send + Sync>` so any
//! backend can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `gatekeeper_hardware::HwError`.

use crate::error::GateError;

/// Map a sensor-side error to a typed `GateError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> GateError {
    #[cfg(feature = "hardware-errors")]
    {
        use gatekeeper_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Timeout | HwError::DataReadyTimeout => GateError::SensorTimeout,
                other => GateError::Sensor(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        GateError::SensorTimeout
    } else {
        GateError::Sensor(s)
    }
}

/// Map a transport-side error to `GateError::Notify`.
pub fn map_notify_error(e: &(dyn std::error::Error + 'static)) -> GateError {
    GateError::Notify(e.to_string())
}
