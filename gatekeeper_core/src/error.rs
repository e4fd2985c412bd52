use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("sensor error: {0}")]
    Sensor(String),
    #[error("timeout waiting for sensor")]
    SensorTimeout,
    #[error("notification failed: {0}")]
    Notify(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// Sensor failures cost one sample; they never stop the loop.
    pub fn is_sensor(&self) -> bool {
        matches!(self, Self::Sensor(_) | Self::SensorTimeout)
    }
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing distance sensor")]
    MissingSensor,
    #[error("missing notification dispatcher")]
    MissingDispatcher,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
