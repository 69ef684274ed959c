#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation must reject bad input without panicking.
    let Ok(cfg) = weightcast_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A validated config must convert and pass the engine's own checks.
    let runtime = weightcast_core::ForecastCfg::from(&cfg.forecast);
    if let Some(goal) = cfg.goal.as_ref() {
        let built = weightcast_core::Forecaster::builder()
            .with_goal(goal.into())
            .with_config(runtime)
            .try_build();
        assert!(built.is_ok(), "validated config rejected: {built:?}");
    }
});
