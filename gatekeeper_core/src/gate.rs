//! Stable gate state and transition detection.

use crate::debouncer::Debouncer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

impl GateState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge of the stable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed,
}

impl Transition {
    /// State the gate is in after this edge.
    pub fn target(self) -> GateState {
        match self {
            Self::Opened => GateState::Open,
            Self::Closed => GateState::Closed,
        }
    }
}

/// Two-state machine fed by a [`Debouncer`].
///
/// Only a unanimous window that disagrees with the current state moves it.
/// Mixed windows, and unanimous windows that agree with the current state,
/// are no-ops.
#[derive(Debug, Clone, Default)]
pub struct GateStateMachine {
    state: GateState,
}

impl GateStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Evaluate the window after a sample; returns the edge taken, if any.
    pub fn evaluate(&mut self, window: &Debouncer) -> Option<Transition> {
        let edge = match self.state {
            GateState::Closed if window.is_unanimous_open() => Transition::Opened,
            GateState::Open if window.is_unanimous_closed() => Transition::Closed,
            _ => return None,
        };
        self.state = edge.target();
        Some(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(readings: &[u16]) -> Debouncer {
        let mut d = Debouncer::new(readings.len()).unwrap();
        for &mm in readings {
            d.record(mm, 200);
        }
        d
    }

    #[test]
    fn opens_once_on_unanimous_window() {
        let mut sm = GateStateMachine::new();
        let w = window(&[100; 5]);
        assert_eq!(sm.evaluate(&w), Some(Transition::Opened));
        assert_eq!(sm.state(), GateState::Open);
        assert_eq!(sm.evaluate(&w), None);
    }

    #[test]
    fn closes_from_open() {
        let mut sm = GateStateMachine::new();
        sm.evaluate(&window(&[100; 5]));
        assert_eq!(sm.evaluate(&window(&[300; 5])), Some(Transition::Closed));
        assert_eq!(sm.state(), GateState::Closed);
    }

    #[test]
    fn closed_window_while_closed_is_noop() {
        let mut sm = GateStateMachine::new();
        assert_eq!(sm.evaluate(&window(&[300; 5])), None);
    }

    #[test]
    fn mixed_window_never_moves() {
        let mixed = window(&[100, 100, 300, 100, 100]);
        let mut sm = GateStateMachine::new();
        assert_eq!(sm.evaluate(&mixed), None);
        sm.evaluate(&window(&[100; 5]));
        assert_eq!(sm.evaluate(&mixed), None);
        assert_eq!(sm.state(), GateState::Open);
    }
}
