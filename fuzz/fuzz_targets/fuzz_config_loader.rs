#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation must reject bad input with an error, never a panic.
    if let Ok(cfg) = toml::from_str::<gatekeeper_config::Config>(data) {
        let _ = cfg.validate();
    }
});
