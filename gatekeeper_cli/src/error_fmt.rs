//! Human-readable error descriptions and structured JSON error formatting.

use gatekeeper_core::error::{BuildError, GateError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensor => {
                "What happened: No distance sensor was provided to the monitor.\nLikely causes: The sensor failed to initialize or was not wired into the builder.\nHow to fix: Ensure the sensor is created successfully and passed via with_sensor(...).".to_string()
            }
            BuildError::MissingDispatcher => {
                "What happened: No notification dispatcher was provided to the monitor.\nLikely causes: The transport failed to initialize or was not wired into the builder.\nHow to fix: Ensure a Dispatcher is spawned and passed via with_dispatcher(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/gatekeeper.toml for a sample."
            ),
        };
    }

    if let Some(ge) = err.downcast_ref::<GateError>() {
        return match ge {
            GateError::SensorTimeout => "What happened: Distance sensor read timed out.\nLikely causes: VL53L0X not wired correctly, no power, wrong I2C bus/address, or timeout too low.\nHow to fix: Check [sensor] i2c_bus and i2c_address (try `i2cdetect -y 1`), and consider raising sensor.read_timeout_ms.".to_string(),
            GateError::Sensor(msg) => format!(
                "What happened: Distance sensor error ({msg}).\nLikely causes: Sensor missing or unpowered, I2C disabled, or a malformed GATEKEEPER_SIM_MM script in simulation.\nHow to fix: Verify wiring and that I2C is enabled; in simulation use a comma-separated list such as `100,100,300`."
            ),
            GateError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/gatekeeper.toml for a sample."
            ),
            GateError::Notify(msg) => format!(
                "What happened: Notification failed ({msg}).\nLikely causes: Wrong bot token, unknown chat id, or no network.\nHow to fix: Check [notify] token and [recipients], or run with --dry-run."
            ),
        };
    }

    // String-based heuristics for errors coming from init
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("telegram") && lower.contains("client") {
        return "What happened: Could not set up the Telegram HTTP client.\nLikely causes: TLS backend unavailable on this system.\nHow to fix: Re-run with --log-level=debug for details, or use --dry-run.".to_string();
    }

    if lower.contains("log filter") || lower.contains("log file") {
        return format!(
            "What happened: Logging could not be initialized ({msg}).\nLikely causes: Invalid --log-level / logging.level, or an unwritable logging.file.\nHow to fix: Use a level such as `info` or `gatekeeper_core=debug`, and check the log directory permissions."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 for configuration problems, 3 for sensor failures, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<GateError>() {
        Some(GateError::Config(_)) => 2,
        Some(e) if e.is_sensor() => 3,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<GateError>() {
        Some(GateError::Config(_)) => "Config",
        Some(GateError::Sensor(_)) => "Sensor",
        Some(GateError::SensorTimeout) => "SensorTimeout",
        Some(GateError::Notify(_)) => "Notify",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GateError::Config("x".into()), 2, "Config")]
    #[case(GateError::Sensor("gone".into()), 3, "Sensor")]
    #[case(GateError::SensorTimeout, 3, "SensorTimeout")]
    #[case(GateError::Notify("401".into()), 1, "Notify")]
    fn typed_errors_map_to_codes(#[case] e: GateError, #[case] code: i32, #[case] reason: &str) {
        let r = eyre::Report::new(e);
        assert_eq!(exit_code_for_error(&r), code);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&r)).unwrap();
        assert_eq!(v["reason"], reason);
        assert_eq!(v["exit_code"], code);
        assert!(v["message"].as_str().unwrap().starts_with("What happened:"));
    }

    #[test]
    fn build_errors_are_config_errors() {
        let r = eyre::Report::new(BuildError::InvalidConfig("slot_count must be >= 1"));
        assert_eq!(exit_code_for_error(&r), 2);
        assert!(humanize(&r).contains("slot_count must be >= 1"));
    }

    #[test]
    fn untyped_errors_fall_back() {
        let r = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&r), 1);
        let h = humanize(&r);
        assert!(h.starts_with("Something went wrong."));
        assert!(h.contains("boom"));
    }

    #[test]
    fn timeout_hint_names_the_config_knob() {
        let r = eyre::Report::new(GateError::SensorTimeout);
        assert!(humanize(&r).contains("sensor.read_timeout_ms"));
    }
}
