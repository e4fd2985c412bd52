//! `From` implementations bridging `gatekeeper_config` types to `gatekeeper_core` types.

use std::time::Duration;

use crate::config::{MonitorCfg, Timeouts};
use crate::message::Recipients;

// ── MonitorCfg ───────────────────────────────────────────────────────────────

impl From<&gatekeeper_config::Config> for MonitorCfg {
    fn from(c: &gatekeeper_config::Config) -> Self {
        Self {
            threshold_mm: c.sensor.threshold_mm,
            slot_count: c.sampling.slot_count,
            interval: Duration::from_millis(c.sampling.interval_ms),
            long_open: Duration::from_secs(c.alarm.long_open_secs),
        }
    }
}

// ── Timeouts ─────────────────────────────────────────────────────────────────

impl From<&gatekeeper_config::Config> for Timeouts {
    fn from(c: &gatekeeper_config::Config) -> Self {
        Self {
            sensor: Duration::from_millis(c.sensor.read_timeout_ms),
            notify: Duration::from_millis(c.notify.timeout_ms),
        }
    }
}

// ── Recipients ───────────────────────────────────────────────────────────────

impl From<&gatekeeper_config::Recipients> for Recipients {
    fn from(c: &gatekeeper_config::Recipients) -> Self {
        Self::new(c.notify.clone(), c.debug.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_to_monitor_defaults() {
        let cfg = gatekeeper_config::Config::default();
        assert_eq!(MonitorCfg::from(&cfg), MonitorCfg::default());
        assert_eq!(MonitorCfg::from(&cfg).long_open_cycles(), 30);
    }

    #[test]
    fn timeouts_come_from_sensor_and_notify() {
        let mut cfg = gatekeeper_config::Config::default();
        cfg.sensor.read_timeout_ms = 75;
        cfg.notify.timeout_ms = 1500;
        let t = Timeouts::from(&cfg);
        assert_eq!(t.sensor, Duration::from_millis(75));
        assert_eq!(t.notify, Duration::from_millis(1500));
    }
}
