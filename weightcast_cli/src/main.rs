mod cli;
mod error_fmt;
mod forecast;

use std::fs;
use std::io::{self, IsTerminal};

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use tracing_appender::non_blocking::WorkerGuard;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        let json = JSON_MODE.get().copied().unwrap_or(false);
        if json {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
            tracing::debug!(error = ?err, "command failed");
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let cfg = weightcast_config::load_toml(&text)
        .map_err(|e| eyre::eyre!("parse config {}: {e}", cli.config.display()))?;
    cfg.validate()?;

    // Dropped when the command returns, flushing the file sink.
    let _guard = init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match &cli.cmd {
        Commands::Forecast {
            measurements,
            unit,
            mode,
            today,
        } => forecast::run_forecast(
            &cfg,
            &forecast::ForecastArgs {
                measurements,
                unit: unit.map(Into::into),
                mode: (*mode).into(),
                today: *today,
                json: cli.json,
            },
        ),
        Commands::Check => forecast::run_check(&cfg, cli.json),
    }
}

/// Console logs go to stderr at `--log-level` (JSON lines with --json). The
/// optional `[logging]` file sink always writes JSON lines at `logging.level`.
fn init_tracing(cli: &Cli, logging: &weightcast_config::Logging) -> Result<Option<WorkerGuard>> {
    let level = cli.log_level.as_str();
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;

    let console = if cli.json {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };

    let mut guard = None;
    let file = match logging.file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file must name a file"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let file_level = logging.level.as_deref().unwrap_or("info");
            let file_filter = EnvFilter::try_new(file_level)
                .wrap_err_with(|| format!("invalid logging.level '{file_level}'"))?;
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard = Some(worker);
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_filter(file_filter)
                    .boxed(),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
    Ok(guard)
}
