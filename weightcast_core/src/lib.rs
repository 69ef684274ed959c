#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Weight trajectory forecasting (pure, I/O-free).
//!
//! Given dated body-weight measurements and a goal, this crate projects the
//! future trajectory from the current trend toward the target and returns a
//! chart-ready series of actual and projected samples.
//!
//! ## Architecture
//!
//! - **Normalization**: unit conversion, date window, one sample per day (`normalize`)
//! - **Rate**: recency-weighted trend in kg/week (`rate`)
//! - **Horizon**: explicit end date or the curve-settled projected arrival (`horizon`)
//! - **Curve**: time decay, goal progress and ending taper (`curve`)
//! - **Generation**: bounded `Stepping -> Converging -> Done` machine (`generator`)
//! - **Monotonicity**: no reversals, exact terminal point (`monotonic`)
//! - **Chart**: actual and forecast merged by date (`chart`)
//!
//! All weights are kilograms internally; `Forecaster` converts results to
//! the requested output unit at the boundary. Degenerate input never errors:
//! the result carries actual data only and a `ForecastStatus` explaining why.

pub mod builder;
pub mod chart;
pub mod config;
pub mod conversions;
pub mod curve;
pub mod engine;
pub mod error;
pub mod generator;
pub mod horizon;
pub mod monotonic;
pub mod normalize;
pub mod rate;
pub mod status;
pub mod supersede;
pub mod types;
pub mod util;

pub use builder::{ForecasterBuilder, Missing, Set};
pub use chart::ChartMode;
pub use config::{CurveCfg, ForecastCfg};
pub use conversions::measurements_from_rows;
pub use engine::{Forecaster, run_forecast};
pub use error::{BuildError, ForecastError, Report, Result};
pub use status::{ForecastStatus, SkipReason, Termination};
pub use supersede::{LatestOnly, Ticket};
pub use types::{
    Direction, ForecastResult, Goal, KG_PER_LB, RawMeasurement, Sample, Series, WeightUnit,
};
