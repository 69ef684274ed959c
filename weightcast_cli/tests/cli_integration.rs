use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const GOAL: &str = r#"
[goal]
start_date = "2026-01-05"
start_weight = 100.0
target_weight = 80.0
"#;

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, body).unwrap();
    path
}

fn write_measurements(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("weights.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "date,weight,unit").unwrap();
    writeln!(f, "2026-01-05,100.0,kg").unwrap();
    writeln!(f, "2026-01-12,98.0,").unwrap();
    writeln!(f, "2026-01-19,96.0,kg").unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["check"], 0, "config ok", "stdout")]
#[case(&["forecast"], 2, "required", "stderr")]
#[case(&["forecast", "--measurements", "missing.csv"], 1, "could not be opened", "stderr")]
#[case(&["forecast", "--measurements", "config/missing.csv"], 1, "could not be opened", "stderr")]
#[case(&["forecast", "--measurements", "{csv}", "--today", "2026-01-25"], 0, "status: projected (converged)", "stdout")]
#[case(&["forecast", "--measurements", "{csv}", "--today", "2026-01-25", "--mode", "actual-range"], 0, "2026-01-19", "stdout")]
#[case(&["forecast", "--measurements", "{csv}", "--today", "not-a-date"], 2, "invalid value", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, GOAL);
    let csv = write_measurements(&dir);

    let mut cmd = Command::cargo_bin("weightcast_cli").unwrap();

    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg);
    cmd.current_dir(dir.path());

    for a in args {
        if *a == "{csv}" {
            cmd.arg(&csv);
        } else {
            cmd.arg(a);
        }
    }

    let assert = cmd.assert().code(exit_code);

    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn forecast_text_ends_on_target() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, GOAL);
    let csv = write_measurements(&dir);

    let out = Command::cargo_bin("weightcast_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("forecast")
        .arg("--measurements")
        .arg(&csv)
        .arg("--today")
        .arg("2026-01-25")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let last_point = stdout
        .lines()
        .filter(|l| l.ends_with("forecast"))
        .last()
        .expect("forecast rows");
    assert!(last_point.contains("80.00"), "{last_point}");
    assert!(stdout.contains("target date:"));
    assert!(stdout.contains("trend: -2.00 kg/week"));
}

#[rstest]
fn cli_reports_bad_measurement_header() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, GOAL);

    let bad_csv = dir.path().join("bad.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "day,kg").unwrap();
    writeln!(f, "2026-01-05,100.0").unwrap();

    let mut cmd = Command::cargo_bin("weightcast_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("forecast")
        .arg("--measurements")
        .arg(&bad_csv);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
#[case::no_goal("[forecast]\nstep_days = 2\n", "[goal]")]
#[case::bad_step(
    "[forecast]\nstep_days = 0\n\n[goal]\nstart_date = \"2026-01-05\"\nstart_weight = 100.0\ntarget_weight = 80.0\n",
    "step_days"
)]
#[case::bad_rotation("[logging]\nrotation = \"weekly\"\n", "rotation")]
#[case::unparseable("[forecast\n", "parse config")]
fn config_problems_exit_with_usage_code(#[case] body: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, body);

    Command::cargo_bin("weightcast_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn log_file_receives_json_lines() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("weightcast.log");
    let body = format!(
        "{GOAL}\n[logging]\nfile = {:?}\nlevel = \"debug\"\n",
        log.to_string_lossy()
    );
    let cfg = write_config(&dir, &body);
    let csv = write_measurements(&dir);

    Command::cargo_bin("weightcast_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("forecast")
        .arg("--measurements")
        .arg(&csv)
        .arg("--today")
        .arg("2026-01-25")
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    let first = text.lines().next().expect("at least one log line");
    let v: serde_json::Value = serde_json::from_str(first).unwrap();
    assert!(v.get("level").is_some());
    assert!(text.contains("forecast complete"));
}
