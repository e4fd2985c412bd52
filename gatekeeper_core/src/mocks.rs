//! Test and helper mocks for gatekeeper_core.

use gatekeeper_traits::{BoxError, DistanceSensor, Notifier};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Notifier that records every (recipient, text) pair it is asked to send.
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Texts sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, t)| t).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&mut self, recipient: &str, text: &str) -> Result<(), BoxError> {
        if let Ok(mut v) = self.sent.lock() {
            v.push((recipient.to_string(), text.to_string()));
        }
        Ok(())
    }
}

/// Notifier whose every send fails, like an unreachable API.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&mut self, _recipient: &str, _text: &str) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("transport unavailable")))
    }
}

/// Sensor that always errors on read.
pub struct DeadSensor;

impl DistanceSensor for DeadSensor {
    fn read(&mut self, _timeout: Duration) -> Result<u16, BoxError> {
        Err(Box::new(std::io::Error::other("sensor not responding")))
    }
}
