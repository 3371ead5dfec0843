//! End-to-end tests for the `compass` binary.
//!
//! Each test runs the real binary against payload files in a temporary
//! directory, with `HOME` pointed there so no user config leaks in.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn compass_binary() -> String {
    env!("CARGO_BIN_EXE_compass").to_string()
}

fn compass(home: &Path) -> Command {
    let mut command = Command::new(compass_binary());
    command
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("COMPASS_HOURS_PER_DAY")
        .env_remove("COMPASS_WINDOW_DAYS")
        .env_remove("COMPASS_TIMEZONE");
    command
}

fn write_payload(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("payload.json");
    std::fs::write(&path, contents).unwrap();
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

const OVERLOADED_PAYLOAD: &str = r#"{
    "events": [
        {"id": "e1", "title": "Planning", "start": "2025-11-26T09:00:00Z", "end": "2025-11-26T15:00:00Z", "type": "meeting"}
    ],
    "tasks": [
        {"id": "t1", "title": "Low priority task", "dueDate": "2025-11-26", "estimatedHours": 5, "priority": "low"}
    ]
}"#;

#[test]
fn test_forecast_json_from_file() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(temp.path(), OVERLOADED_PAYLOAD);

    let output = compass(temp.path())
        .args(["forecast", "--today", "2025-11-25", "--json"])
        .arg(&payload)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "forecast should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    assert_eq!(json["summary"]["windowStart"], "2025-11-25");
    assert_eq!(json["summary"]["windowEnd"], "2025-12-01");
    assert_eq!(json["days"].as_array().unwrap().len(), 7);

    let action = &json["days"][1]["suggestedActions"][0];
    assert_eq!(action["type"], "moveTask");
    assert_eq!(action["taskId"], "t1");
    assert_eq!(action["toDate"], "2025-11-25");
}

#[test]
fn test_forecast_reads_stdin() {
    let temp = TempDir::new().unwrap();

    let mut child = compass(temp.path())
        .args(["forecast", "-", "--today", "2025-11-25"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(OVERLOADED_PAYLOAD.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("CAPACITY FORECAST: 2025-11-25 to 2025-12-01"));
    assert!(stdout.contains("Move \"Low priority task\" to 2025-11-25 to reduce overload"));
}

#[test]
fn test_config_file_sets_window() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(temp.path(), "{}");
    let config = temp.path().join("compass.toml");
    std::fs::write(&config, "window_days = 3\nhours_per_day = 6.0\n").unwrap();

    let output = compass(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["forecast", "--today", "2025-11-25", "--json"])
        .arg(&payload)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["days"].as_array().unwrap().len(), 3);
    assert_eq!(json["days"][0]["capacityHours"], 6.0);
}

#[test]
fn test_payload_config_beats_environment() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(temp.path(), r#"{"config": {"windowDays": 2}}"#);

    let output = compass(temp.path())
        .env("COMPASS_WINDOW_DAYS", "10")
        .args(["forecast", "--today", "2025-11-25", "--json"])
        .arg(&payload)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["days"].as_array().unwrap().len(), 2);
}

#[test]
fn test_invalid_payload_json_error_body() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(temp.path(), r#"{"tasks": "not a list"}"#);

    let output = compass(temp.path())
        .args(["forecast", "--json"])
        .arg(&payload)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["error"], "tasks must be an array");
    assert!(json.get("details").is_none());
}

#[test]
fn test_invalid_task_reports_index() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(
        temp.path(),
        r#"{"tasks": [{"id": "t1", "title": "A", "dueDate": "2025-11-27", "estimatedHours": -1, "priority": "low"}]}"#,
    );

    let output = compass(temp.path())
        .args(["forecast", "--json"])
        .arg(&payload)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["error"], "Invalid request payload");
    assert!(
        json["details"]
            .as_str()
            .unwrap()
            .starts_with("invalid tasks entry at index 0")
    );
}

#[test]
fn test_explain_day_json() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(temp.path(), OVERLOADED_PAYLOAD);

    let output = compass(temp.path())
        .args(["explain", "2025-11-26"])
        .arg(&payload)
        .args(["--today", "2025-11-25", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["mainDriver"], "meetings");
    assert_eq!(json["topContributors"][0]["title"], "Planning");
}

#[test]
fn test_explain_outside_window_fails() {
    let temp = TempDir::new().unwrap();
    let payload = write_payload(temp.path(), "{}");

    let output = compass(temp.path())
        .args(["explain", "2026-01-01"])
        .arg(&payload)
        .args(["--today", "2025-11-25"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2026-01-01 is outside the forecast window 2025-11-25 to 2025-12-01"));
}

#[test]
fn test_estimate_text() {
    let temp = TempDir::new().unwrap();

    let output = compass(temp.path())
        .args(["estimate", "Design system architecture"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "6.0h  Based on \"design\", \"architecture\"\n"
    );
}

#[test]
fn test_sample_pipes_into_forecast() {
    let temp = TempDir::new().unwrap();

    let sample = compass(temp.path())
        .args(["sample", "--today", "2025-11-25"])
        .output()
        .unwrap();
    assert!(sample.status.success());
    let payload = write_payload(temp.path(), &String::from_utf8_lossy(&sample.stdout));

    let output = compass(temp.path())
        .args(["forecast", "--today", "2025-11-25", "--json"])
        .arg(&payload)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["overflowTasks"].as_array().unwrap().len(), 0);
    assert_eq!(json["days"][0]["meetingHours"], 2.5);
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();

    let output = compass(temp.path()).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}
