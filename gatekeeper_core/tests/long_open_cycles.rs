// Focused tests for cycle arithmetic.
use std::time::Duration;

use gatekeeper_core::MonitorCfg;
use gatekeeper_core::util::{div_ceil_u64, duration_phrase};
use rstest::rstest;

fn cfg(slot_count: usize, interval_ms: u64, long_open_s: u64) -> MonitorCfg {
    MonitorCfg {
        threshold_mm: 200,
        slot_count,
        interval: Duration::from_millis(interval_ms),
        long_open: Duration::from_secs(long_open_s),
    }
}

#[rstest]
#[case(5, 2000, 300, 30)]
#[case(5, 2000, 301, 31)]
#[case(5, 2000, 299, 30)]
#[case(5, 2000, 5, 1)]
#[case(1, 1000, 1, 1)]
#[case(4, 500, 7, 4)]
fn cycles_round_up(
    #[case] slots: usize,
    #[case] interval_ms: u64,
    #[case] long_open_s: u64,
    #[case] expected: u32,
) {
    assert_eq!(cfg(slots, interval_ms, long_open_s).long_open_cycles(), expected);
}

#[test]
fn cycle_length_is_slots_times_interval() {
    assert_eq!(cfg(5, 2000, 300).cycle(), Duration::from_secs(10));
}

#[test]
fn div_ceil_guards_zero_denominator() {
    assert_eq!(div_ceil_u64(10, 0), 10);
    assert_eq!(div_ceil_u64(10, 3), 4);
    assert_eq!(div_ceil_u64(0, 3), 0);
}

#[test]
fn duration_phrase_prefers_minutes() {
    assert_eq!(duration_phrase(300), "5 minute(s)");
    assert_eq!(duration_phrase(45), "45 second(s)");
    assert_eq!(duration_phrase(150), "150 second(s)");
}
