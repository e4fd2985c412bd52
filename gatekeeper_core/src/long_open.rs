//! Repeating alarm for a gate left open.
//!
//! Evaluated once per completed window cycle, never per sample. Each
//! unanimous-open cycle extends the streak; anything else breaks it. When
//! the streak reaches `fire_after` cycles the alarm fires and the streak
//! starts over, so a gate that stays open alarms again one full interval
//! later.

#[derive(Debug, Clone)]
pub struct LongOpenMonitor {
    streak: u32,
    fire_after: u32,
}

impl LongOpenMonitor {
    /// `fire_after` is clamped to at least one cycle.
    pub fn new(fire_after: u32) -> Self {
        Self {
            streak: 0,
            fire_after: fire_after.max(1),
        }
    }

    /// Feed one cycle boundary. Returns true when the alarm fires.
    pub fn on_cycle(&mut self, unanimous_open: bool) -> bool {
        if !unanimous_open {
            if self.streak > 0 {
                tracing::trace!(streak = self.streak, "long-open streak broken");
            }
            self.streak = 0;
            return false;
        }
        self.streak = self.streak.saturating_add(1);
        if self.streak >= self.fire_after {
            self.streak = 0;
            return true;
        }
        false
    }

    /// Consecutive unanimous-open cycles since the last reset.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn fire_after(&self) -> u32 {
        self.fire_after
    }
}
