use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Poll `ready` until it reports true or `timeout` expires.
/// Sleeps `poll_interval` between checks so a slow sensor does not pin a core.
/// Errors from `ready` are returned as-is.
pub fn poll_until_ready(
    ready: impl FnMut() -> Result<bool>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    poll_until_deadline(ready, Instant::now() + timeout, poll_interval)
}

/// Like [`poll_until_ready`], but against an absolute deadline so several
/// waits in one operation share a single budget.
pub fn poll_until_deadline(
    mut ready: impl FnMut() -> Result<bool>,
    deadline: Instant,
    poll_interval: Duration,
) -> Result<()> {
    while !ready()? {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(HwError::DataReadyTimeout);
        }
        std::thread::sleep(poll_interval.min(left));
    }
    Ok(())
}
