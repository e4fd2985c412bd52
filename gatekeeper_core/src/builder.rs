//! Builder for [`Daemon`]: collects the collaborators, validates the
//! runtime config once, and hands back a ready-to-run loop.

use gatekeeper_traits::DistanceSensor;
use gatekeeper_traits::clock::{Clock, MonotonicClock};

use crate::config::{MonitorCfg, Timeouts};
use crate::dispatch::Dispatcher;
use crate::error::{BuildError, Result};
use crate::message::Recipients;
use crate::monitor::GateMonitor;
use crate::runner::Daemon;

/// Builder for `Daemon`. All fields are validated on `build()`.
#[derive(Default)]
pub struct DaemonBuilder {
    sensor: Option<Box<dyn DistanceSensor>>,
    clock: Option<Box<dyn Clock>>,
    dispatcher: Option<Dispatcher>,
    monitor: MonitorCfg,
    timeouts: Timeouts,
    recipients: Recipients,
}

impl DaemonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensor(mut self, sensor: impl DistanceSensor + 'static) -> Self {
        self.sensor = Some(Box::new(sensor));
        self
    }

    /// Defaults to [`MonotonicClock`].
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_monitor(mut self, cfg: MonitorCfg) -> Self {
        self.monitor = cfg;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_recipients(mut self, recipients: Recipients) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn build(self) -> Result<Daemon> {
        let sensor = self
            .sensor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensor))?;
        let dispatcher = self
            .dispatcher
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDispatcher))?;

        // ── Validation ───────────────────────────────────────────────────────
        self.monitor
            .validate()
            .map_err(|m| eyre::Report::new(BuildError::InvalidConfig(m)))?;
        if self.timeouts.sensor.is_zero() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sensor timeout must be > 0",
            )));
        }

        if self.recipients.notify().is_empty() {
            tracing::warn!("no recipients configured; gate changes will only be logged");
        }

        let monitor = GateMonitor::new(self.monitor)?;
        let clock = self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new()));
        Ok(Daemon::new(
            sensor,
            clock,
            monitor,
            self.recipients,
            dispatcher,
            self.timeouts.sensor,
        ))
    }
}
