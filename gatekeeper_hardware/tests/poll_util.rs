use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use gatekeeper_hardware::error::HwError;
use gatekeeper_hardware::util::{poll_until_deadline, poll_until_ready};

#[test]
fn poll_until_ready_success_path() {
    let ready = Arc::new(AtomicBool::new(false));
    let ready_bg = ready.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(3));
        ready_bg.store(true, Ordering::Relaxed);
    });

    let res = poll_until_ready(
        || Ok(ready.load(Ordering::Relaxed)),
        Duration::from_millis(200),
        Duration::from_micros(200),
    );
    assert!(res.is_ok(), "expected success, got {res:?}");
}

#[test]
fn poll_until_ready_timeout_path() {
    let err = poll_until_ready(
        || Ok(false),
        Duration::from_millis(5),
        Duration::from_micros(200),
    )
    .expect_err("expected timeout error");

    match err {
        HwError::DataReadyTimeout => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn poll_until_ready_propagates_bus_errors() {
    let calls = AtomicUsize::new(0);
    let err = poll_until_ready(
        || {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(HwError::I2c("nack".into()))
        },
        Duration::from_millis(50),
        Duration::from_micros(200),
    )
    .expect_err("bus error should surface");
    assert!(matches!(err, HwError::I2c(_)));
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn sequential_waits_share_one_deadline() {
    let budget = Duration::from_millis(100);
    let start = Instant::now();
    let deadline = start + budget;

    // First stage clears late in the budget; the second never does.
    poll_until_deadline(
        || Ok(start.elapsed() >= Duration::from_millis(80)),
        deadline,
        Duration::from_millis(2),
    )
    .expect("first stage clears in time");
    let err = poll_until_deadline(|| Ok(false), deadline, Duration::from_millis(2))
        .expect_err("second stage must run out of budget");

    assert!(matches!(err, HwError::DataReadyTimeout));
    let blocked = start.elapsed();
    assert!(
        blocked < budget + Duration::from_millis(40),
        "blocked {blocked:?} for a {budget:?} budget"
    );
}

#[test]
fn expired_deadline_still_checks_once() {
    let past = Instant::now();
    thread::sleep(Duration::from_millis(1));
    assert!(poll_until_deadline(|| Ok(true), past, Duration::from_millis(1)).is_ok());
    assert!(matches!(
        poll_until_deadline(|| Ok(false), past, Duration::from_millis(1)),
        Err(HwError::DataReadyTimeout)
    ));
}

#[test]
fn only_data_ready_expiry_becomes_read_timeout() {
    let err = poll_until_deadline(
        || Err(HwError::I2c("nack".into())),
        Instant::now() + Duration::from_millis(20),
        Duration::from_millis(1),
    )
    .map_err(HwError::into_read_timeout)
    .expect_err("bus error should surface");
    assert!(matches!(err, HwError::I2c(ref m) if m == "nack"), "{err:?}");

    let err = poll_until_deadline(
        || Ok(false),
        Instant::now() + Duration::from_millis(5),
        Duration::from_millis(1),
    )
    .map_err(HwError::into_read_timeout)
    .expect_err("expected timeout");
    assert!(matches!(err, HwError::Timeout));
}
