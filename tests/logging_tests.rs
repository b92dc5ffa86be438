use predicates::prelude::*;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::kansha_command;

#[test]
fn test_default_logging_is_quiet() {
    let dir = tempdir().unwrap();

    kansha_command(dir.path())
        .args(["write", "-d", "2024-03-01", "Family"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_text_logs_include_root_span() {
    let dir = tempdir().unwrap();

    kansha_command(dir.path())
        .args(["--verbose", "write", "-d", "2024-03-01", "Family"])
        .assert()
        .success()
        .stderr(predicate::str::contains("app_invocation"))
        .stderr(predicate::str::contains("correlation_id"))
        .stderr(predicate::str::contains("Command completed"));
}

#[test]
fn test_json_log_lines_parse() {
    let dir = tempdir().unwrap();

    let output = kansha_command(dir.path())
        .args(["--verbose", "--log-format", "json", "show", "-d", "2024-03-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<serde_json::Value> = stderr
        .lines()
        .map(|line| serde_json::from_str(line).expect("each log line should be JSON"))
        .collect();
    assert!(!lines.is_empty());
    assert!(lines
        .iter()
        .all(|line| line["span"]["name"] == "app_invocation"));
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "Command completed"));
}

#[test]
fn test_log_format_from_environment() {
    let dir = tempdir().unwrap();

    kansha_command(dir.path())
        .env("KANSHA_LOG_FORMAT", "json")
        .env("RUST_LOG", "info")
        .args(["show", "-d", "2024-03-01"])
        .assert()
        .success()
        .stderr(predicate::str::starts_with("{"));
}

#[test]
fn test_failure_is_logged_once() {
    let dir = tempdir().unwrap();

    let output = kansha_command(dir.path())
        .args(["show", "-d", "yesterday"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("kansha failed").count(), 1, "stderr: {}", stderr);
}
