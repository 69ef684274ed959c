//! `forecast` and `check` subcommands.

use std::path::Path;

use chrono::NaiveDate;
use eyre::WrapErr;
use weightcast_core::{
    ChartMode, ForecastCfg, ForecastResult, ForecastStatus, Forecaster, Goal, SkipReason,
    Termination, WeightUnit, measurements_from_rows,
};
use weightcast_traits::{Calendar, FixedCalendar, SystemCalendar};

/// Stable snake_case name for a skip reason (used in text output and logs).
pub fn skip_reason_name(r: SkipReason) -> &'static str {
    match r {
        SkipReason::InvalidGoal => "invalid_goal",
        SkipReason::NoChange => "no_change",
        SkipReason::AlreadyReached => "already_reached",
        SkipReason::InsufficientData => "insufficient_data",
        SkipReason::NonConvergent => "non_convergent",
        SkipReason::HorizonElapsed => "horizon_elapsed",
    }
}

fn termination_name(t: Termination) -> &'static str {
    match t {
        Termination::Converged => "converged",
        Termination::Horizon => "horizon",
        Termination::IterationCap => "iteration_cap",
    }
}

fn goal_from_config(cfg: &weightcast_config::Config) -> eyre::Result<Goal> {
    let Some(goal) = cfg.goal.as_ref() else {
        eyre::bail!("config has no [goal] section; add start_date, start_weight and target_weight");
    };
    Ok(goal.into())
}

pub struct ForecastArgs<'a> {
    pub measurements: &'a Path,
    pub unit: Option<WeightUnit>,
    pub mode: ChartMode,
    pub today: Option<NaiveDate>,
    pub json: bool,
}

pub fn run_forecast(cfg: &weightcast_config::Config, args: &ForecastArgs<'_>) -> eyre::Result<()> {
    let goal = goal_from_config(cfg)?;
    let rows = weightcast_config::load_measurements_csv(args.measurements)?;
    let records = measurements_from_rows(&rows);
    tracing::info!(
        rows = rows.len(),
        usable = records.len(),
        path = %args.measurements.display(),
        "loaded measurements"
    );

    let unit = args.unit.unwrap_or_else(|| cfg.display.unit.into());
    let builder = Forecaster::builder()
        .with_goal(goal)
        .with_config(ForecastCfg::from(&cfg.forecast))
        .with_mode(args.mode)
        .with_output_unit(unit);
    let forecaster = match args.today {
        Some(today) => builder.with_calendar(FixedCalendar::new(today)),
        None => builder.with_calendar(SystemCalendar::new()),
    }
    .try_build()
    .wrap_err("build forecaster")?;

    let result = forecaster.forecast(&records);
    match result.status {
        ForecastStatus::Projected { termination } => tracing::info!(
            termination = termination_name(termination),
            points = result.points.len(),
            "forecast complete"
        ),
        ForecastStatus::ActualOnly { reason } => {
            tracing::info!(reason = skip_reason_name(reason), "no forecast produced");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        print_text(&result);
    }
    Ok(())
}

fn print_text(result: &ForecastResult) {
    let unit = result.unit;
    println!("{:<12} {:>10}  source", "date", "weight");
    for s in &result.points {
        let source = if s.is_actual { "actual" } else { "forecast" };
        println!("{:<12} {:>7.2} {:<2}  {source}", s.date, s.weight, unit);
    }
    match result.status {
        ForecastStatus::Projected { termination } => {
            println!("status: projected ({})", termination_name(termination));
        }
        ForecastStatus::ActualOnly { reason } => {
            println!("status: actual only ({})", skip_reason_name(reason));
        }
    }
    if let Some(d) = result.target_date {
        println!("target date: {d}");
    }
    if let Some(h) = result.horizon {
        println!("horizon: {h}");
    }
    if let Some(r) = result.rate_per_week {
        println!("trend: {r:+.2} {unit}/week");
    }
}

pub fn run_check(cfg: &weightcast_config::Config, json: bool) -> eyre::Result<()> {
    let goal = goal_from_config(cfg)?;
    let unit: WeightUnit = cfg.display.unit.into();
    let start = unit.from_kg(goal.start_weight);
    let target = unit.from_kg(goal.target_weight);
    let today = SystemCalendar::new().today();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "goal": {
                    "start_date": goal.start_date,
                    "end_date": goal.end_date,
                    "start_weight": start,
                    "target_weight": target,
                    "direction": goal.direction(),
                    "unit": unit,
                },
                "days_elapsed": SystemCalendar::new().days_since(goal.start_date),
            })
        );
    } else {
        println!("config ok");
        println!(
            "goal: {start:.2} {unit} -> {target:.2} {unit} ({:?}) from {}",
            goal.direction(),
            goal.start_date
        );
        match goal.end_date {
            Some(end) => println!("ends: {end}"),
            None => println!("ends: open (window runs to {today})"),
        }
    }
    Ok(())
}
