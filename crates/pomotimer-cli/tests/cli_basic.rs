//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and
//! verify its output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomotimer"))
        .args(args)
        .env("POMOTIMER_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_timer_status_on_fresh_install() {
    let dir = tempfile::tempdir().unwrap();
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["sessionType"], "focus");
    assert_eq!(status["currentSession"], 1);
    assert_eq!(status["remainingSecs"], 1500);
    assert_eq!(status["isRunning"], false);
}

#[test]
fn test_skip_is_persisted_and_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    let skipped = run_json(dir.path(), &["timer", "skip"]);
    assert_eq!(skipped["type"], "SessionSkipped");
    assert_eq!(skipped["to"], "shortBreak");

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["sessionType"], "shortBreak");
    assert_eq!(status["remainingSecs"], 300);

    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["totalSessions"], 0);
}

#[test]
fn test_complete_counts_focus_session() {
    let dir = tempfile::tempdir().unwrap();
    let completed = run_json(dir.path(), &["timer", "complete"]);
    assert_eq!(completed["type"], "SessionCompleted");
    assert_eq!(completed["counted"], true);

    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["todaySessions"], 1);
    assert_eq!(stats["totalSessions"], 1);
    assert_eq!(stats["todayFocusMinutes"], 25);
    assert_eq!(stats["todayFocus"], "25m");
}

#[test]
fn test_stats_show_reports_focus_time_in_hours() {
    let dir = tempfile::tempdir().unwrap();
    for _ in 0..5 {
        run_json(dir.path(), &["timer", "complete"]);
        run_json(dir.path(), &["timer", "skip"]);
    }
    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["totalSessions"], 5);
    assert_eq!(stats["totalFocusMinutes"], 125);
    assert_eq!(stats["totalFocus"], "2h 5m");
}

#[test]
fn test_settings_set_updates_idle_timer() {
    let dir = tempfile::tempdir().unwrap();
    let updated = run_json(dir.path(), &["settings", "set", "focus_duration", "30"]);
    assert_eq!(updated["type"], "SettingsUpdated");
    assert_eq!(updated["remainingSecs"], 1800);

    let settings = run_json(dir.path(), &["settings", "show"]);
    assert_eq!(settings["focusDuration"], 30);
    assert_eq!(settings["shortBreakDuration"], 5);
}

#[test]
fn test_settings_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["settings", "set", "theme", "dark"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("theme"), "stderr: {stderr}");
}

#[test]
fn test_config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let key = "timer.sessions_before_long_break";
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", key]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", key, "2"]);
    assert_eq!(code, 0);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["sessionsBeforeLongBreak"], 2);
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_foreground_run_applies_keys_and_quits() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) =
        run_cli_with_input(dir.path(), &["timer", "run", "--paused"], "k\nq\n");
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Focus"));

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["sessionType"], "shortBreak");
}

#[test]
fn test_foreground_run_ends_on_eof() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_with_input(dir.path(), &["timer", "run"], "");
    assert_eq!(code, 0, "stderr: {stderr}");
}
