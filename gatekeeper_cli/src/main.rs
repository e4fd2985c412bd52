#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `gatekeeper`: watch a gate with a distance sensor and report changes over Telegram.

mod cli;
mod daemon;
mod error_fmt;
mod telegram;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use gatekeeper_core::error::GateError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::{Cli, Commands, JSON_MODE, json_mode};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

const DEFAULT_LOG_LEVEL: &str = "info";

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if json_mode() {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = gatekeeper_config::load_file(&cli.config)
        .map_err(|e| eyre::Report::new(GateError::Config(e.to_string())))?;

    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    // Dropping the guard flushes the log file.
    let _log_guard = init_tracing(cli.json, level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match cli.cmd {
        Commands::Run { dry_run, ticks } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }
            let summary = daemon::run_monitor(&cfg, dry_run, ticks, &shutdown)?;
            daemon::print_summary(&summary);
        }
        Commands::SelfCheck => daemon::self_check(&cfg)?,
        Commands::Health => daemon::health(&cfg),
    }
    Ok(())
}

fn make_filter(level: &str) -> eyre::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| eyre::eyre!("invalid log filter {level:?}: {e}"))
}

/// Console logs go to stderr so stdout stays machine-readable. With
/// `logging.file` set, JSON lines are also written there.
fn init_tracing(
    json: bool,
    level: &str,
    logging: &gatekeeper_config::Logging,
) -> eyre::Result<Option<WorkerGuard>> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    if json {
        layers.push(console.json().with_filter(make_filter(level)?).boxed());
    } else {
        layers.push(console.with_filter(make_filter(level)?).boxed());
    }

    let mut guard = None;
    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("log file path {file:?} has no file name"))?;
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("create log file directory {}", dir.display()))?;
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(make_filter(level)?)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(guard)
}
