//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gatekeeper", version, about = "Gate state monitor")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/gatekeeper.toml")]
    pub config: PathBuf,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides logging.level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the gate and send notifications until interrupted
    Run {
        /// Log notifications instead of sending them; no bot token needed
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
        /// Stop after this many samples
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
    },
    /// Probe the distance sensor once and report what it sees
    SelfCheck,
    /// Print the effective monitoring parameters
    Health,
}

pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}
