//! The sampling loop.
//!
//! Strictly sequential: read, step the monitor, queue notifications, sleep
//! until the next period. Monitor state is owned here and nowhere else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gatekeeper_traits::DistanceSensor;
use gatekeeper_traits::clock::Clock;
use tracing::{info, trace, warn};

use crate::builder::DaemonBuilder;
use crate::dispatch::{DispatchStats, Dispatcher};
use crate::gate::GateState;
use crate::hw_error::map_hw_error;
use crate::message::{self, Recipients};
use crate::monitor::GateMonitor;
use crate::status::Tick;

/// Totals reported when the daemon stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub sensor_failures: u64,
    pub dispatch: DispatchStats,
}

pub struct Daemon {
    sensor: Box<dyn DistanceSensor>,
    clock: Box<dyn Clock>,
    monitor: GateMonitor,
    recipients: Recipients,
    dispatcher: Dispatcher,
    read_timeout: Duration,
    consecutive_failures: u32,
    ticks: u64,
    sensor_failures: u64,
}

impl core::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Daemon")
            .field("state", &self.monitor.state())
            .field("ticks", &self.ticks)
            .field("sensor_failures", &self.sensor_failures)
            .finish()
    }
}

impl Daemon {
    pub fn builder() -> DaemonBuilder {
        DaemonBuilder::new()
    }

    pub(crate) fn new(
        sensor: Box<dyn DistanceSensor>,
        clock: Box<dyn Clock>,
        monitor: GateMonitor,
        recipients: Recipients,
        dispatcher: Dispatcher,
        read_timeout: Duration,
    ) -> Self {
        Self {
            sensor,
            clock,
            monitor,
            recipients,
            dispatcher,
            read_timeout,
            consecutive_failures: 0,
            ticks: 0,
            sensor_failures: 0,
        }
    }

    /// Queue the startup notice for debug recipients.
    pub fn announce_startup(&self, sensor_present: bool) -> usize {
        let msgs = message::startup_messages(sensor_present, &self.recipients);
        self.dispatcher.submit_all(msgs)
    }

    /// One period's work, without the sleep.
    ///
    /// A failed read skips the sample entirely: the window, its cursor, the
    /// stable state and the long-open streak are all left as they were.
    pub fn tick(&mut self) -> Tick {
        self.ticks = self.ticks.saturating_add(1);
        match self.sensor.read(self.read_timeout) {
            Ok(distance_mm) => {
                if self.consecutive_failures > 0 {
                    info!(failures = self.consecutive_failures, "sensor recovered");
                    self.consecutive_failures = 0;
                }
                let outcome = self.monitor.step(distance_mm);
                trace!(distance_mm, state = %self.monitor.state(), "sample");
                let queued = if outcome.is_quiet() {
                    0
                } else {
                    let msgs = message::for_outcome(
                        &outcome,
                        &self.monitor.window().distances(),
                        self.monitor.cfg().long_open_secs(),
                        &self.recipients,
                    );
                    self.dispatcher.submit_all(msgs)
                };
                Tick::Sampled {
                    distance_mm,
                    outcome,
                    queued,
                }
            }
            Err(e) => {
                let err = map_hw_error(e.as_ref());
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                self.sensor_failures = self.sensor_failures.saturating_add(1);
                warn!(
                    error = %err,
                    failures = self.consecutive_failures,
                    "sensor read failed; sample skipped"
                );
                Tick::SensorFailed(err)
            }
        }
    }

    /// Tick on a fixed period until `shutdown` is set or `max_ticks` have run.
    ///
    /// Periods are measured from the start of each tick. A tick that overruns
    /// its period starts the next one immediately; missed periods are not
    /// made up.
    pub fn run(&mut self, shutdown: &AtomicBool, max_ticks: Option<u64>) -> u64 {
        let period = self.monitor.cfg().interval;
        let mut ran: u64 = 0;
        let mut next = self.clock.now();
        info!(
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            slot_count = self.monitor.cfg().slot_count,
            threshold_mm = self.monitor.cfg().threshold_mm,
            "monitor loop started"
        );
        loop {
            if shutdown.load(Ordering::Relaxed) {
                info!("shutdown requested");
                break;
            }
            if max_ticks.is_some_and(|m| ran >= m) {
                break;
            }
            self.tick();
            ran += 1;

            next += period;
            let now = self.clock.now();
            if next < now {
                trace!("tick overran its period");
                next = now;
            }
            self.clock.sleep_until(next);
        }
        ran
    }

    pub fn state(&self) -> GateState {
        self.monitor.state()
    }

    pub fn monitor(&self) -> &GateMonitor {
        &self.monitor
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    /// Stop the dispatcher (delivering anything still queued) and report totals.
    pub fn finish(self) -> RunSummary {
        let ticks = self.ticks;
        let sensor_failures = self.sensor_failures;
        let dispatch = self.dispatcher.shutdown();
        info!(
            ticks,
            sensor_failures,
            delivered = dispatch.delivered,
            failed = dispatch.failed,
            dropped = dispatch.dropped,
            "daemon stopped"
        );
        RunSummary {
            ticks,
            sensor_failures,
            dispatch,
        }
    }
}
