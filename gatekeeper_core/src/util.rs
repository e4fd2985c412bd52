//! Small arithmetic helpers shared by the monitor.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Integer division rounding toward positive infinity.
/// - `den == 0` is treated as 1 so callers never divide by zero.
#[inline]
pub fn div_ceil_u64(num: u64, den: u64) -> u64 {
    num.div_ceil(den.max(1))
}

/// Human phrase for an alarm duration: whole minutes when exact, else seconds.
pub fn duration_phrase(secs: u64) -> String {
    if secs >= 60 && secs % 60 == 0 {
        format!("{} minute(s)", secs / 60)
    } else {
        format!("{secs} second(s)")
    }
}
