use std::time::Duration;

use gatekeeper_core::error::BuildError;
use gatekeeper_core::mocks::RecordingNotifier;
use gatekeeper_core::{Daemon, Dispatcher, GateError, MonitorCfg, Timeouts};
use gatekeeper_hardware::SimulatedSensor;
use rstest::rstest;

fn build_err(b: gatekeeper_core::DaemonBuilder) -> eyre::Report {
    match b.build() {
        Err(e) => e,
        Ok(_) => panic!("build should fail"),
    }
}

#[test]
fn requires_sensor_and_dispatcher() {
    let err = build_err(Daemon::builder());
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingSensor)
    ));

    let err = build_err(Daemon::builder().with_sensor(SimulatedSensor::constant(1)));
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingDispatcher)
    ));
}

#[rstest]
#[case(MonitorCfg { threshold_mm: 0, ..MonitorCfg::default() }, "threshold_mm")]
#[case(MonitorCfg { slot_count: 0, ..MonitorCfg::default() }, "slot_count")]
#[case(MonitorCfg { interval: Duration::ZERO, ..MonitorCfg::default() }, "interval")]
#[case(MonitorCfg { long_open: Duration::ZERO, ..MonitorCfg::default() }, "long-open")]
fn rejects_bad_monitor_cfg(#[case] cfg: MonitorCfg, #[case] needle: &str) {
    let err = build_err(
        Daemon::builder()
            .with_sensor(SimulatedSensor::constant(1))
            .with_dispatcher(Dispatcher::spawn(RecordingNotifier::new(), 1))
            .with_monitor(cfg),
    );
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert!(msg.contains(needle), "{msg}"),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn rejects_zero_sensor_timeout() {
    let err = build_err(
        Daemon::builder()
            .with_sensor(SimulatedSensor::constant(1))
            .with_dispatcher(Dispatcher::spawn(RecordingNotifier::new(), 1))
            .with_timeouts(Timeouts {
                sensor: Duration::ZERO,
                ..Timeouts::default()
            }),
    );
    assert!(err.to_string().contains("sensor timeout"));
}

#[test]
fn monitor_rejects_zero_slots_as_config_error() {
    let err = gatekeeper_core::GateMonitor::new(MonitorCfg {
        slot_count: 0,
        ..MonitorCfg::default()
    })
    .expect_err("must fail");
    assert!(matches!(err, GateError::Config(_)));
}

#[rstest]
#[case(MonitorCfg { threshold_mm: 0, ..MonitorCfg::default() })]
#[case(MonitorCfg { slot_count: 0, ..MonitorCfg::default() })]
#[case(MonitorCfg { interval: Duration::ZERO, ..MonitorCfg::default() })]
#[case(MonitorCfg { long_open: Duration::ZERO, ..MonitorCfg::default() })]
fn monitor_and_builder_agree_on_bad_cfg(#[case] cfg: MonitorCfg) {
    let reason = cfg.validate().expect_err("cfg is invalid");

    match gatekeeper_core::GateMonitor::new(cfg.clone()) {
        Err(GateError::Config(msg)) => assert_eq!(msg, reason),
        other => panic!("expected Config error, got {other:?}"),
    }

    let err = build_err(
        Daemon::builder()
            .with_sensor(SimulatedSensor::constant(1))
            .with_dispatcher(Dispatcher::spawn(RecordingNotifier::new(), 1))
            .with_monitor(cfg),
    );
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert_eq!(*msg, reason),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn default_monitor_cfg_is_valid() {
    assert_eq!(MonitorCfg::default().validate(), Ok(()));
}
