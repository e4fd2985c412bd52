#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core gate-monitoring logic (hardware-agnostic).
//!
//! All I/O goes through `gatekeeper_traits::DistanceSensor` and
//! `gatekeeper_traits::Notifier`.
//!
//! ## Architecture
//!
//! - **Debouncer**: ring of "at or below threshold" bits (`debouncer`)
//! - **Gate state**: Open/Closed machine driven by unanimous windows (`gate`)
//! - **Long-open alarm**: repeating alert after N open cycles (`long_open`)
//! - **Monitor**: the three above, stepped once per sample (`monitor`)
//! - **Messages**: recipient fan-out and message text (`message`)
//! - **Dispatch**: background, non-blocking delivery (`dispatch`)
//! - **Runner**: the fixed-period sampling loop (`runner`, `builder`)
//!
//! ## Failure policy
//!
//! Sensor errors skip the sample. Notification errors are logged by the
//! dispatcher and dropped. Neither can touch the window, the stable state
//! or the long-open streak.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod debouncer;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod hw_error;
pub mod long_open;
pub mod message;
pub mod mocks;
pub mod monitor;
pub mod runner;
pub mod status;
pub mod util;

pub use builder::DaemonBuilder;
pub use config::{MonitorCfg, Timeouts};
pub use debouncer::{Debouncer, Slot};
pub use dispatch::{DispatchStats, Dispatcher, LogNotifier};
pub use error::{BuildError, GateError};
pub use gate::{GateState, GateStateMachine, Transition};
pub use long_open::LongOpenMonitor;
pub use message::{Outgoing, Recipients};
pub use monitor::{GateMonitor, StepOutcome};
pub use runner::{Daemon, RunSummary};
pub use status::Tick;
