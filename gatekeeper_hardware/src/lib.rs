#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Distance sensor backends: a scripted simulation and, behind the
//! `hardware` feature, a VL53L0X on the Raspberry Pi I2C bus.
pub mod error;
pub mod util;
#[cfg(feature = "hardware")]
pub mod vl53l0x;

use gatekeeper_traits::{BoxError, DistanceSensor};
use std::time::Duration;

use crate::error::HwError;

/// Environment variable read by [`SimulatedSensor::from_env`].
pub const SIM_ENV: &str = "GATEKEEPER_SIM_MM";

/// Distance reported by the simulation when nothing is configured: well
/// beyond any sane threshold, i.e. a closed gate.
pub const SIM_DEFAULT_MM: u16 = 1000;

/// Scripted distance sensor.
///
/// Replays `script` in order. A looping script repeats forever; a one-shot
/// script fails every read after its last value.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    script: Vec<u16>,
    pos: usize,
    looping: bool,
}

impl SimulatedSensor {
    /// Sensor that always reports `mm`.
    pub fn constant(mm: u16) -> Self {
        Self::looping(vec![mm])
    }

    /// Replay `script` repeatedly.
    pub fn looping(script: Vec<u16>) -> Self {
        Self {
            script,
            pos: 0,
            looping: true,
        }
    }

    /// Replay `script` once; later reads fail with `ScriptExhausted`.
    pub fn once(script: Vec<u16>) -> Self {
        Self {
            script,
            pos: 0,
            looping: false,
        }
    }

    /// Parse a comma-separated list of millimetre readings, e.g. `"100,100,300"`.
    pub fn parse_script(s: &str) -> error::Result<Vec<u16>> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u16>()
                    .map_err(|e| HwError::BadScript(format!("{t:?}: {e}")))
            })
            .collect::<error::Result<Vec<_>>>()
            .and_then(|v| {
                if v.is_empty() {
                    Err(HwError::BadScript("no readings".into()))
                } else {
                    Ok(v)
                }
            })
    }

    /// Build from `GATEKEEPER_SIM_MM`, falling back to a constant closed-gate reading.
    pub fn from_env() -> error::Result<Self> {
        match std::env::var(SIM_ENV) {
            Ok(s) => Ok(Self::looping(Self::parse_script(&s)?)),
            Err(_) => Ok(Self::constant(SIM_DEFAULT_MM)),
        }
    }
}

impl DistanceSensor for SimulatedSensor {
    fn read(&mut self, _timeout: Duration) -> Result<u16, BoxError> {
        if self.looping && self.pos >= self.script.len() {
            self.pos = 0;
        }
        let Some(&mm) = self.script.get(self.pos) else {
            return Err(Box::new(HwError::ScriptExhausted));
        };
        self.pos = self.pos.saturating_add(1);
        tracing::trace!(mm, "simulated range");
        Ok(mm)
    }
}

#[cfg(feature = "hardware")]
pub struct HardwareSensor {
    dev: vl53l0x::Vl53l0x,
}

#[cfg(feature = "hardware")]
impl HardwareSensor {
    pub fn new(bus: u8, address: u16) -> error::Result<Self> {
        let dev = vl53l0x::Vl53l0x::new(bus, address)?;
        Ok(Self { dev })
    }
}

#[cfg(feature = "hardware")]
impl DistanceSensor for HardwareSensor {
    fn read(&mut self, timeout: Duration) -> Result<u16, BoxError> {
        match self.dev.read_single_with_timeout(timeout) {
            Ok(mm) => {
                tracing::debug!(mm, "vl53l0x sample");
                Ok(mm)
            }
            Err(e) => {
                tracing::debug!(error = %e, "vl53l0x read failed");
                Err(Box::new(e))
            }
        }
    }
}

/// Take one reading to confirm the sensor answers.
pub fn probe(sensor: &mut dyn DistanceSensor, timeout: Duration) -> Result<u16, BoxError> {
    sensor.read(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_millis(10);

    #[test]
    fn looping_script_wraps() {
        let mut s = SimulatedSensor::looping(vec![100, 300]);
        let got: Vec<u16> = (0..5).map(|_| s.read(T).unwrap()).collect();
        assert_eq!(got, vec![100, 300, 100, 300, 100]);
    }

    #[test]
    fn once_script_fails_after_end() {
        let mut s = SimulatedSensor::once(vec![150]);
        assert_eq!(s.read(T).unwrap(), 150);
        let err = s.read(T).unwrap_err();
        assert!(err.to_string().contains("exhausted"));
    }

    #[test]
    fn parse_script_accepts_spaces_and_rejects_garbage() {
        assert_eq!(
            SimulatedSensor::parse_script(" 100, 200 ,300").unwrap(),
            vec![100, 200, 300]
        );
        assert!(SimulatedSensor::parse_script("100,abc").is_err());
        assert!(SimulatedSensor::parse_script(" , ").is_err());
    }

    #[test]
    fn probe_reports_reading() {
        let mut s = SimulatedSensor::constant(42);
        assert_eq!(probe(&mut s, T).unwrap(), 42);
    }
}
