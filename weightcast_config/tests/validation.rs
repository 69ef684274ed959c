use rstest::rstest;
use weightcast_config::{UnitCfg, load_toml};

const FULL: &str = r#"
[forecast]
sustainable_rate_kg_per_week = 0.9
recency_base = 1.2
step_days = 2
buffer_days = 14
max_steps = 730

[forecast.curve]
decay_base = 0.5
decay_smoothing = 0.6
taper_threshold = 0.75
taper_exponent = 2.2

[display]
unit = "lb"

[logging]
level = "debug"
rotation = "daily"

[goal]
start_date = "2026-01-01"
start_weight = 100.0
target_weight = 80.0
weekly_rate_goal = 0.7
"#;

#[test]
fn empty_config_uses_defaults_and_validates() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults should pass");
    assert_eq!(cfg.forecast.step_days, 2);
    assert_eq!(cfg.forecast.max_steps, 730);
    assert!((cfg.forecast.sustainable_rate_kg_per_week - 0.9).abs() < 1e-12);
    assert_eq!(cfg.display.unit, UnitCfg::Kg);
    assert!(cfg.goal.is_none());
}

#[test]
fn full_config_parses() {
    let cfg = load_toml(FULL).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.display.unit, UnitCfg::Lb);
    let goal = cfg.goal.expect("goal section");
    assert_eq!(goal.start_date.to_string(), "2026-01-01");
    assert!(goal.end_date.is_none());
    assert_eq!(goal.weekly_rate_goal, Some(0.7));
    assert_eq!(goal.unit, UnitCfg::Kg);
}

#[rstest]
#[case("[forecast]\nstep_days = 0", "step_days must be >= 1")]
#[case("[forecast]\nmax_steps = 0", "max_steps must be >= 1")]
#[case("[forecast]\nrecency_base = 1.0", "recency_base must be > 1.0")]
#[case("[forecast]\nsustainable_rate_kg_per_week = 0.0", "sustainable_rate_kg_per_week must be > 0")]
#[case("[forecast.curve]\ndecay_base = 1.5", "decay_base must be in (0.0, 1.0)")]
#[case("[forecast.curve]\ntaper_threshold = 1.0", "taper_threshold must be in (0.0, 1.0)")]
#[case("[logging]\nrotation = \"weekly\"", "rotation must be one of")]
#[case(
    "[goal]\nstart_date = \"2026-02-01\"\nend_date = \"2026-01-01\"\nstart_weight = 90.0\ntarget_weight = 80.0",
    "end_date must not precede"
)]
#[case(
    "[goal]\nstart_date = \"2026-02-01\"\nstart_weight = 90.0\ntarget_weight = 80.0\nweekly_rate_goal = -1.0",
    "weekly_rate_goal must be > 0"
)]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[test]
fn unknown_unit_fails_to_parse() {
    let toml = "[display]\nunit = \"stone\"";
    assert!(load_toml(toml).is_err());
}

#[test]
fn goal_requires_start_date() {
    let toml = "[goal]\nstart_weight = 90.0\ntarget_weight = 80.0";
    assert!(load_toml(toml).is_err());
}
