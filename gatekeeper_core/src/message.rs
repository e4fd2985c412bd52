//! Message fan-out: who hears about what, and with which text.
//!
//! Bodies use Telegram HTML; the transport is expected to honor `<b>`.

use crate::gate::Transition;
use crate::monitor::StepOutcome;
use crate::util::duration_phrase;

/// A message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub recipient: String,
    pub text: String,
}

impl Outgoing {
    pub fn new(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
        }
    }
}

/// Configured recipients. Debug recipients are expected to also be listed
/// in `notify`; they additionally get raw readings and the startup message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients {
    notify: Vec<String>,
    debug: Vec<String>,
}

impl Recipients {
    pub fn new(notify: Vec<String>, debug: Vec<String>) -> Self {
        Self { notify, debug }
    }

    pub fn notify(&self) -> &[String] {
        &self.notify
    }

    pub fn debug(&self) -> &[String] {
        &self.debug
    }

    pub fn is_debug(&self, recipient: &str) -> bool {
        self.debug.iter().any(|d| d == recipient)
    }
}

fn status_line(t: Transition) -> &'static str {
    match t {
        Transition::Opened => "<b>Gate opened</b>",
        Transition::Closed => "<b>Gate closed</b>",
    }
}

/// One message per recipient; debug recipients see the raw window appended.
pub fn transition_messages(
    t: Transition,
    window_mm: &[u16],
    recipients: &Recipients,
) -> Vec<Outgoing> {
    let base = status_line(t);
    recipients
        .notify()
        .iter()
        .map(|r| {
            let text = if recipients.is_debug(r) {
                format!("{base} {window_mm:?}")
            } else {
                base.to_string()
            };
            Outgoing::new(r.clone(), text)
        })
        .collect()
}

/// Long-open alarm for every recipient. No debug payload.
pub fn long_open_messages(long_open_secs: u64, recipients: &Recipients) -> Vec<Outgoing> {
    let text = format!(
        "<b>Gate opened for longer than {}</b>",
        duration_phrase(long_open_secs)
    );
    recipients
        .notify()
        .iter()
        .map(|r| Outgoing::new(r.clone(), text.clone()))
        .collect()
}

/// Daemon-started notice for debug recipients only.
pub fn startup_messages(sensor_present: bool, recipients: &Recipients) -> Vec<Outgoing> {
    let text = format!(
        "<b>Gatekeeper Daemon Started</b>\nDistance sensor: {}\n",
        if sensor_present { "Present" } else { "Not present" }
    );
    recipients
        .debug()
        .iter()
        .map(|r| Outgoing::new(r.clone(), text.clone()))
        .collect()
}

/// All messages caused by one monitor step, transitions first.
pub fn for_outcome(
    outcome: &StepOutcome,
    window_mm: &[u16],
    long_open_secs: u64,
    recipients: &Recipients,
) -> Vec<Outgoing> {
    let mut out = Vec::new();
    if let Some(t) = outcome.transition {
        out.extend(transition_messages(t, window_mm, recipients));
    }
    if outcome.long_open_alarm {
        out.extend(long_open_messages(long_open_secs, recipients));
    }
    out
}
