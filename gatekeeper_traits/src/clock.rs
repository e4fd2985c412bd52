use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source used to pace the sampling loop.
///
/// - now(): current monotonic instant
/// - sleep(): block for a duration (implementations may simulate)
/// - sleep_until(): block until a deadline; returns immediately if it already passed
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    fn sleep_until(&self, deadline: Instant) {
        let remaining = deadline.saturating_duration_since(self.now());
        self.sleep(remaining);
    }
}

/// Wall-clock pacing backed by `std::time::Instant` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Clock that only moves when told to. `sleep` advances time instantly.
///
/// Clones share the same timeline, so a test can keep a handle while the
/// loop under test owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, d: Duration) {
        if let Ok(mut e) = self.elapsed.lock() {
            *e = e.saturating_add(d);
        }
    }

    /// Total simulated time since construction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.lock().map(|g| *g).unwrap_or(Duration::ZERO)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_on_sleep() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        clock.sleep(Duration::from_millis(250));
        assert_eq!(clock.now() - t0, Duration::from_millis(250));
    }

    #[test]
    fn sleep_until_past_deadline_is_noop() {
        let clock = ManualClock::new();
        let deadline = clock.now();
        clock.advance(Duration::from_secs(1));
        clock.sleep_until(deadline);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn clones_share_timeline() {
        let a = ManualClock::new();
        let b = a.clone();
        b.sleep_until(b.now() + Duration::from_secs(2));
        assert_eq!(a.elapsed(), Duration::from_secs(2));
    }
}
