use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const FEED: &str = "\
Date,Flow Sensor,Client ID,Interval,Tariff
09/03/2024 12:30:00,2.5,esp32-client-7,5000,2000
09/03/2024 12:30:10,3.0,esp32-client-7,5000,2000
";

// Build a config pointing the feed at a local CSV file
fn write_config_with_feed(dir: &tempfile::TempDir, feed_body: &str) -> PathBuf {
    let feed_path = dir.path().join("feed.csv");
    fs::write(&feed_path, feed_body).unwrap();

    let toml = format!(
        r#"
[feed]
url = "{}"
refresh_secs = 10
cache_ttl_secs = 10
"#,
        feed_path.display()
    );
    let cfg_path = dir.path().join("cfg.toml");
    fs::write(&cfg_path, toml).unwrap();
    cfg_path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["valve"], 2, "required", "stderr")]
#[case(&["valve", "on", "--dry-run"], 0, "Valve: ON", "stdout")]
#[case(&["valve", "off", "--dry-run"], 0, "Valve: OFF", "stdout")]
#[case(&["send-params", "--interval", "5000", "--tariff", "2000", "--dry-run"], 0, "5000,2000", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    for a in args {
        cmd.arg(a);
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
fn fetch_prints_rows_and_defaults_from_a_file_feed() {
    let dir = tempdir().unwrap();
    let cfg = write_config_with_feed(&dir, FEED);

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("fetch");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 rows"))
        .stdout(predicate::str::contains("client=esp32-client-7"))
        .stdout(predicate::str::contains("interval=5000"))
        .stdout(predicate::str::contains("tariff=2000"));
}

#[rstest]
fn fetch_json_emits_serialized_rows() {
    let dir = tempdir().unwrap();
    let cfg = write_config_with_feed(&dir, FEED);

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("--json").arg("fetch");

    let output = cmd.assert().success().get_output().stdout.clone();
    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["client_id"], "esp32-client-7");
    assert_eq!(rows[0]["total_cost"], 2.5 * 2000.0);
    assert_eq!(rows[0]["month"], "2024-03");
}

#[rstest]
fn header_drift_exits_with_the_feed_error_code() {
    let dir = tempdir().unwrap();
    let cfg = write_config_with_feed(
        &dir,
        "Date,Flow,Client ID,Interval,Tariff\n09/03/2024 12:30:00,2.5,x,1,1\n",
    );

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("fetch");

    cmd.assert()
        .code(3)
        .stderr(predicate::str::contains("header row"));
}

#[rstest]
fn feed_errors_are_structured_in_json_mode() {
    let dir = tempdir().unwrap();
    let cfg = write_config_with_feed(&dir, "not,a,telemetry,feed\n");

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("--json").arg("fetch");

    cmd.assert()
        .code(3)
        .stderr(predicate::str::contains(r#""reason":"Feed""#));
}

#[rstest]
fn self_check_reports_row_count() {
    let dir = tempdir().unwrap();
    let cfg = write_config_with_feed(&dir, FEED);

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("self-check ok (2 rows)"));
}

#[rstest]
fn run_with_bounded_iterations_renders_and_exits() {
    let dir = tempdir().unwrap();
    let cfg = write_config_with_feed(&dir, FEED);

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--dry-run")
        .arg("--refresh-secs")
        .arg("1")
        .arg("--iterations")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rows=2"));
}

#[rstest]
fn invalid_config_values_are_rejected() {
    let dir = tempdir().unwrap();
    let cfg_path = dir.path().join("cfg.toml");
    fs::write(&cfg_path, "[feed]\nrefresh_secs = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg(&cfg_path).arg("self-check");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("refresh_secs"));
}

#[rstest]
fn missing_explicit_config_is_an_error() {
    let mut cmd = Command::cargo_bin("flowgate_cli").unwrap();
    cmd.arg("--config").arg("no/such/flowgate.toml").arg("self-check");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("config"));
}
