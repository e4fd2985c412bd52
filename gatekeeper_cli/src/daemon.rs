//! Daemon assembly: config mapping, sensor and transport selection, and the
//! three subcommands built on top of them.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use gatekeeper_config::Config;
use gatekeeper_core::error::{GateError, Result as CoreResult};
use gatekeeper_core::{
    Daemon, Dispatcher, LogNotifier, MonitorCfg, Recipients, RunSummary, Timeouts,
};
use gatekeeper_traits::{DistanceSensor, Notifier};
use serde_json::json;

use crate::cli::json_mode;
use crate::telegram::TelegramNotifier;

pub fn backend_name() -> &'static str {
    if cfg!(feature = "hardware") {
        "vl53l0x"
    } else {
        "simulated"
    }
}

#[cfg(feature = "hardware")]
pub fn make_sensor(cfg: &Config) -> CoreResult<Box<dyn DistanceSensor>> {
    let s = gatekeeper_hardware::HardwareSensor::new(cfg.sensor.i2c_bus, cfg.sensor.i2c_address)
        .map_err(|e| {
            eyre::Report::new(GateError::Sensor(format!(
                "open VL53L0X on i2c-{} at {:#04x}: {e}",
                cfg.sensor.i2c_bus, cfg.sensor.i2c_address
            )))
        })?;
    tracing::info!(
        bus = cfg.sensor.i2c_bus,
        address = cfg.sensor.i2c_address,
        "VL53L0X initialized"
    );
    Ok(Box::new(s))
}

#[cfg(not(feature = "hardware"))]
pub fn make_sensor(_cfg: &Config) -> CoreResult<Box<dyn DistanceSensor>> {
    let s = gatekeeper_hardware::SimulatedSensor::from_env()
        .map_err(|e| eyre::Report::new(GateError::Sensor(format!("simulated sensor: {e}"))))?;
    tracing::info!(env = gatekeeper_hardware::SIM_ENV, "using simulated distance sensor");
    Ok(Box::new(s))
}

fn make_notifier(cfg: &Config, dry_run: bool) -> CoreResult<Box<dyn Notifier + Send>> {
    if dry_run {
        tracing::info!("dry run: notifications are logged, not sent");
        return Ok(Box::new(LogNotifier));
    }
    if cfg.notify.token.trim().is_empty() {
        return Err(eyre::Report::new(GateError::Config(
            "notify.token is empty; set a bot token or pass --dry-run".into(),
        )));
    }
    let timeouts = Timeouts::from(cfg);
    let n = TelegramNotifier::new(&cfg.notify.api_base, &cfg.notify.token, timeouts.notify)?;
    Ok(Box::new(n))
}

/// Probe the sensor once; a failure is logged and reported as "not present".
fn probe_sensor(sensor: &mut dyn DistanceSensor, timeout: Duration) -> bool {
    match gatekeeper_hardware::probe(sensor, timeout) {
        Ok(mm) => {
            tracing::info!(distance_mm = mm, "distance sensor present");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "distance sensor did not answer; continuing");
            false
        }
    }
}

/// Run the monitor until `shutdown` is set or `ticks` samples have been taken.
pub fn run_monitor(
    cfg: &Config,
    dry_run: bool,
    ticks: Option<u64>,
    shutdown: &AtomicBool,
) -> CoreResult<RunSummary> {
    let monitor = MonitorCfg::from(cfg);
    let timeouts = Timeouts::from(cfg);
    let recipients = Recipients::from(&cfg.recipients);
    let long_open_cycles = monitor.long_open_cycles();

    let mut sensor = make_sensor(cfg)?;
    let present = probe_sensor(sensor.as_mut(), timeouts.sensor);
    let notifier = make_notifier(cfg, dry_run)?;
    let dispatcher = Dispatcher::spawn(notifier, cfg.notify.queue_depth);

    let mut daemon = Daemon::builder()
        .with_sensor(sensor)
        .with_dispatcher(dispatcher)
        .with_monitor(monitor)
        .with_timeouts(timeouts)
        .with_recipients(recipients)
        .build()?;

    tracing::info!(
        backend = backend_name(),
        long_open_cycles,
        recipients = cfg.recipients.notify.len(),
        dry_run,
        "gatekeeper started"
    );
    daemon.announce_startup(present);
    daemon.run(shutdown, ticks);
    Ok(daemon.finish())
}

pub fn print_summary(s: &RunSummary) {
    if json_mode() {
        println!(
            "{}",
            json!({
                "ticks": s.ticks,
                "sensor_failures": s.sensor_failures,
                "delivered": s.dispatch.delivered,
                "failed": s.dispatch.failed,
                "dropped": s.dispatch.dropped,
            })
        );
    } else {
        println!(
            "stopped after {} samples ({} sensor failures); notifications: {} delivered, {} failed, {} dropped",
            s.ticks, s.sensor_failures, s.dispatch.delivered, s.dispatch.failed, s.dispatch.dropped
        );
    }
}

/// Read the sensor once. A failure is an error, unlike at daemon startup.
pub fn self_check(cfg: &Config) -> CoreResult<()> {
    let timeouts = Timeouts::from(cfg);
    let mut sensor = make_sensor(cfg)?;
    let mm = gatekeeper_hardware::probe(sensor.as_mut(), timeouts.sensor)
        .map_err(|e| eyre::Report::new(gatekeeper_core::hw_error::map_hw_error(e.as_ref())))?;
    let gate = if mm <= cfg.sensor.threshold_mm {
        "open"
    } else {
        "closed"
    };
    let token_set = !cfg.notify.token.trim().is_empty();
    if json_mode() {
        println!(
            "{}",
            json!({
                "backend": backend_name(),
                "sensor": "present",
                "distance_mm": mm,
                "reading_suggests": gate,
                "token_configured": token_set,
            })
        );
    } else {
        println!("Distance sensor: Present ({mm} mm, backend {})", backend_name());
        println!("Reading suggests the gate is {gate} (threshold {} mm)", cfg.sensor.threshold_mm);
        if !token_set {
            println!("Warning: notify.token is empty; only --dry-run will work");
        }
        println!("OK");
    }
    Ok(())
}

/// Print the effective monitoring parameters without touching hardware.
pub fn health(cfg: &Config) {
    let m = MonitorCfg::from(cfg);
    let cycle_ms = u64::try_from(m.cycle().as_millis()).unwrap_or(u64::MAX);
    if json_mode() {
        println!(
            "{}",
            json!({
                "backend": backend_name(),
                "threshold_mm": m.threshold_mm,
                "slot_count": m.slot_count,
                "interval_ms": cfg.sampling.interval_ms,
                "cycle_ms": cycle_ms,
                "long_open_secs": m.long_open_secs(),
                "long_open_cycles": m.long_open_cycles(),
                "recipients": cfg.recipients.notify.len(),
                "debug_recipients": cfg.recipients.debug.len(),
                "token_configured": !cfg.notify.token.trim().is_empty(),
            })
        );
    } else {
        println!("backend: {}", backend_name());
        println!("threshold: {} mm", m.threshold_mm);
        println!(
            "window: {} slots every {} ms ({cycle_ms} ms per cycle)",
            m.slot_count, cfg.sampling.interval_ms
        );
        println!(
            "long-open alarm: after {} s ({} cycles)",
            m.long_open_secs(),
            m.long_open_cycles()
        );
        println!(
            "recipients: {} ({} debug)",
            cfg.recipients.notify.len(),
            cfg.recipients.debug.len()
        );
    }
}
