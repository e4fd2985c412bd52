#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the gate monitor.
//!
//! - `Config` and its sections are deserialized from TOML; every section
//!   has defaults so an empty file is a valid (if silent) configuration.
//! - `Config::validate` rejects anything that would leave the debounce
//!   semantics undefined. Callers must treat a validation error as fatal.
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Upper bound on the debounce window. Anything larger is almost certainly a typo.
pub const MAX_SLOT_COUNT: usize = 1024;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorCfg {
    /// A reading at or below this distance (mm) counts as "open".
    pub threshold_mm: u16,
    /// Max time to wait for a single ranging measurement.
    pub read_timeout_ms: u64,
    /// I2C bus number (`/dev/i2c-N`).
    pub i2c_bus: u8,
    /// 7-bit I2C address of the ranger.
    pub i2c_address: u16,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            threshold_mm: 200,
            read_timeout_ms: 100,
            i2c_bus: 1,
            i2c_address: 0x29,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SamplingCfg {
    /// Sampling period in ms. Also accepts `period_ms`.
    #[serde(alias = "period_ms")]
    pub interval_ms: u64,
    /// Number of consecutive agreeing samples before the stable state changes.
    pub slot_count: usize,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            slot_count: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AlarmCfg {
    /// Alert when the gate has stayed open at least this long; repeats while open.
    pub long_open_secs: u64,
}

impl Default for AlarmCfg {
    fn default() -> Self {
        Self {
            long_open_secs: 300,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotifyCfg {
    /// Telegram Bot API root, without the `/bot<token>` suffix.
    pub api_base: String,
    /// Bot token. Required unless running with `--dry-run`.
    pub token: String,
    /// Per-request HTTP timeout.
    pub timeout_ms: u64,
    /// Pending messages held for the delivery thread before new ones are dropped.
    pub queue_depth: usize,
}

impl Default for NotifyCfg {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            token: String::new(),
            timeout_ms: 5000,
            queue_depth: 32,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Recipients {
    /// Everyone who hears about transitions and long-open alarms.
    pub notify: Vec<String>,
    /// Subset of `notify` that also gets raw readings and the startup message.
    pub debug: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub sensor: SensorCfg,
    pub sampling: SamplingCfg,
    pub alarm: AlarmCfg,
    pub notify: NotifyCfg,
    pub recipients: Recipients,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text)
        .map_err(|e| eyre::eyre!("invalid configuration in {}: {}", path.display(), e))?;
    cfg.validate()
        .map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    Ok(cfg)
}

fn reject_duplicates(list: &[String], what: &str) -> eyre::Result<()> {
    let mut seen = HashSet::new();
    for r in list {
        if r.trim().is_empty() {
            eyre::bail!("{what} contains an empty recipient id");
        }
        if !seen.insert(r.as_str()) {
            eyre::bail!("{what} lists recipient {r:?} more than once");
        }
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sensor
        if self.sensor.threshold_mm == 0 {
            eyre::bail!("sensor.threshold_mm must be > 0");
        }
        if self.sensor.read_timeout_ms == 0 {
            eyre::bail!("sensor.read_timeout_ms must be >= 1");
        }
        if self.sensor.i2c_address > 0x7F {
            eyre::bail!("sensor.i2c_address must be a 7-bit address (<= 0x7f)");
        }

        // Sampling
        if self.sampling.slot_count == 0 {
            eyre::bail!("sampling.slot_count must be >= 1");
        }
        if self.sampling.slot_count > MAX_SLOT_COUNT {
            eyre::bail!("sampling.slot_count is unreasonably large (>{MAX_SLOT_COUNT})");
        }
        if self.sampling.interval_ms == 0 {
            eyre::bail!("sampling.interval_ms must be >= 1");
        }
        if self.sampling.interval_ms > 60 * 60 * 1000 {
            eyre::bail!("sampling.interval_ms is unreasonably large (>1h)");
        }

        // Alarm
        if self.alarm.long_open_secs == 0 {
            eyre::bail!("alarm.long_open_secs must be >= 1");
        }

        // Notify
        if self.notify.timeout_ms == 0 {
            eyre::bail!("notify.timeout_ms must be >= 1");
        }
        if self.notify.queue_depth == 0 {
            eyre::bail!("notify.queue_depth must be >= 1");
        }
        if !(self.notify.api_base.starts_with("http://")
            || self.notify.api_base.starts_with("https://"))
        {
            eyre::bail!("notify.api_base must be an http(s) URL");
        }

        // Recipients
        reject_duplicates(&self.recipients.notify, "recipients.notify")?;
        reject_duplicates(&self.recipients.debug, "recipients.debug")?;
        if let Some(stray) = self
            .recipients
            .debug
            .iter()
            .find(|d| !self.recipients.notify.contains(d))
        {
            eyre::bail!("recipients.debug entry {stray:?} is not listed in recipients.notify");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
