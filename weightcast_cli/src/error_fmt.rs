//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use weightcast_core::error::{BuildError, ForecastError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingGoal => {
                "What happened: No goal was provided to the forecaster.\nLikely causes: The config has no [goal] section.\nHow to fix: Add [goal] with start_date, start_weight and target_weight.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. Use `weightcast check` to validate it."
            ),
        };
    }

    if let Some(fe) = err.downcast_ref::<ForecastError>() {
        return match fe {
            ForecastError::Unit(u) => format!(
                "What happened: Unknown weight unit '{u}'.\nLikely causes: A typo in the unit column or setting.\nHow to fix: Use kg or lb."
            ),
            ForecastError::InvalidGoal(msg) => format!(
                "What happened: The goal cannot be forecast ({msg}).\nLikely causes: Non-positive or non-finite weights in [goal].\nHow to fix: Edit the [goal] table, then rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from config or CSV loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("measurements csv must have headers") {
        return "Invalid headers in measurements CSV. Expected 'date,weight,unit'.".to_string();
    }

    if lower.contains("open measurements csv") {
        return format!(
            "What happened: The measurements file could not be opened.\nLikely causes: Wrong path or missing read permission.\nHow to fix: Check the --measurements path. Original: {msg}"
        );
    }

    if lower.contains("invalid csv row") {
        return format!(
            "What happened: A measurements row could not be parsed.\nLikely causes: A non-numeric weight or a missing column.\nHow to fix: Fix the row named below. Original: {msg}"
        );
    }

    if lower.contains("no [goal] section") {
        return "What happened: The config does not describe a goal.\nLikely causes: The [goal] table is missing.\nHow to fix: Add [goal] with start_date, start_weight and target_weight.".to_string();
    }

    if is_usage_error(&lower) {
        return format!(
            "What happened: Configuration is invalid or unreadable.\nLikely causes: {msg}.\nHow to fix: Edit the TOML config and try again."
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

// Config loading and logging setup errors lead with a fixed prefix;
// validation messages lead with the offending TOML key.
fn is_usage_error(lower: &str) -> bool {
    [
        "read config",
        "parse config",
        "config has no [goal]",
        "invalid log level",
        "invalid logging.level",
        "forecast.",
        "goal.",
        "logging.",
    ]
    .iter()
    .any(|p| lower.starts_with(p))
}

/// Configuration and usage problems exit with 2, everything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use weightcast_core::error::BuildError;
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    let lower = err.to_string().to_ascii_lowercase();
    if is_usage_error(&lower) {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    use weightcast_core::error::BuildError;

    let reason = match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingGoal) => "MissingGoal",
        Some(BuildError::InvalidConfig(_)) => "InvalidConfig",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
