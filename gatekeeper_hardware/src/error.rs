use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("i2c error: {0}")]
    I2c(String),
    #[error("sensor read timeout")]
    Timeout,
    #[error("vl53l0x data-ready timeout")]
    DataReadyTimeout,
    #[error("unexpected sensor model id 0x{0:02x}")]
    WrongModel(u8),
    #[error("simulated sensor script exhausted")]
    ScriptExhausted,
    #[error("invalid simulation script: {0}")]
    BadScript(String),
}

impl HwError {
    /// Report a data-ready expiry as a read timeout; every other error is kept.
    pub fn into_read_timeout(self) -> Self {
        match self {
            Self::DataReadyTimeout => Self::Timeout,
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, HwError>;
