//! CLI argument definitions and shared statics.

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "weightcast", version, about = "Weight trajectory forecasting CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/weightcast.toml")]
    pub config: PathBuf,

    /// Emit results and logs as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Unit for printed weights.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum UnitArg {
    Kg,
    Lb,
}

impl From<UnitArg> for weightcast_core::WeightUnit {
    fn from(u: UnitArg) -> Self {
        match u {
            UnitArg::Kg => Self::Kg,
            UnitArg::Lb => Self::Lb,
        }
    }
}

/// Portion of the merged series to print.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    /// Actual data followed by the forecast
    Full,
    /// Only the span covered by actual data
    ActualRange,
}

impl From<ModeArg> for weightcast_core::ChartMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Full => Self::Full,
            ModeArg::ActualRange => Self::ActualRangeOnly,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Forecast the weight trajectory toward the configured goal
    Forecast {
        /// Measurements CSV (headers: date,weight,unit)
        #[arg(long, value_name = "FILE")]
        measurements: PathBuf,
        /// Output unit (defaults to display.unit from the config)
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,
        /// Which part of the chart series to print
        #[arg(long, value_enum, default_value = "full")]
        mode: ModeArg,
        /// Forecast as of this date instead of the system date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        today: Option<NaiveDate>,
    },
    /// Validate the config file and print the effective goal
    Check,
}
