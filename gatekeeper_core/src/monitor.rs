//! The gate monitor: debouncer, state machine and long-open alarm wired together.
//!
//! `GateMonitor::step` is the whole per-sample algorithm. It performs no
//! I/O; callers turn the returned [`StepOutcome`] into notifications.

use tracing::{debug, info};

use crate::config::MonitorCfg;
use crate::debouncer::Debouncer;
use crate::error::GateError;
use crate::gate::{GateState, GateStateMachine, Transition};
use crate::long_open::LongOpenMonitor;

/// What a single sample changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Stable-state edge taken on this sample.
    pub transition: Option<Transition>,
    /// This sample completed a window cycle.
    pub cycle_complete: bool,
    /// The long-open alarm fired on this sample's cycle boundary.
    pub long_open_alarm: bool,
}

impl StepOutcome {
    pub fn is_quiet(&self) -> bool {
        self.transition.is_none() && !self.long_open_alarm
    }
}

#[derive(Debug, Clone)]
pub struct GateMonitor {
    cfg: MonitorCfg,
    window: Debouncer,
    gate: GateStateMachine,
    long_open: LongOpenMonitor,
}

impl GateMonitor {
    pub fn new(cfg: MonitorCfg) -> Result<Self, GateError> {
        cfg.validate().map_err(|m| GateError::Config(m.into()))?;
        let window = Debouncer::new(cfg.slot_count)?;
        let long_open = LongOpenMonitor::new(cfg.long_open_cycles());
        debug!(
            threshold_mm = cfg.threshold_mm,
            slot_count = cfg.slot_count,
            long_open_cycles = long_open.fire_after(),
            "gate monitor initialized"
        );
        Ok(Self {
            cfg,
            window,
            gate: GateStateMachine::new(),
            long_open,
        })
    }

    /// Feed one sample.
    ///
    /// Transitions are evaluated on every sample; the long-open alarm only on
    /// the sample that completes a window cycle.
    pub fn step(&mut self, distance_mm: u16) -> StepOutcome {
        let cycle_complete = self.window.record(distance_mm, self.cfg.threshold_mm);
        let transition = self.gate.evaluate(&self.window);
        if let Some(t) = transition {
            info!(
                state = %t.target(),
                window = ?self.window.distances(),
                "gate state changed"
            );
        }

        let long_open_alarm =
            cycle_complete && self.long_open.on_cycle(self.window.is_unanimous_open());
        if long_open_alarm {
            info!(
                long_open_secs = self.cfg.long_open_secs(),
                "gate open too long"
            );
        }

        StepOutcome {
            transition,
            cycle_complete,
            long_open_alarm,
        }
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn window(&self) -> &Debouncer {
        &self.window
    }

    /// Current long-open streak in cycles.
    pub fn long_open_streak(&self) -> u32 {
        self.long_open.streak()
    }

    pub fn cfg(&self) -> &MonitorCfg {
        &self.cfg
    }
}
