//! Capability traits shared across the gatekeeper workspace.
//!
//! The core never talks to hardware or the network directly; it goes through
//! these seams so both can be replaced with simulations in tests.
pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Boxed error used at trait boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A ranging sensor producing one distance sample per call.
pub trait DistanceSensor {
    /// Read a single distance in millimetres, blocking for at most `timeout`.
    fn read(&mut self, timeout: std::time::Duration) -> Result<u16, BoxError>;
}

/// Outbound message transport addressed by an opaque recipient id.
pub trait Notifier {
    fn send(&mut self, recipient: &str, text: &str) -> Result<(), BoxError>;
}

impl<S: DistanceSensor + ?Sized> DistanceSensor for Box<S> {
    fn read(&mut self, timeout: std::time::Duration) -> Result<u16, BoxError> {
        (**self).read(timeout)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&mut self, recipient: &str, text: &str) -> Result<(), BoxError> {
        (**self).send(recipient, text)
    }
}
