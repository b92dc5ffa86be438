use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::kansha_command;

#[test]
fn test_relative_data_dir_is_rejected() {
    let dir = tempdir().unwrap();

    kansha_command(dir.path())
        .env("KANSHA_DIR", "relative/kansha")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an absolute path"));
}

#[test]
fn test_data_dir_defaults_under_home() {
    let home = tempdir().unwrap();

    kansha_command(home.path())
        .env_remove("KANSHA_DIR")
        .args(["write", "-d", "2024-03-01", "Family"])
        .assert()
        .success();

    assert!(home.path().join(".kansha").join("preferences.json").is_file());
}

#[cfg(unix)]
#[test]
fn test_created_data_dir_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempdir().unwrap();
    let data_dir = root.path().join("nested").join("kansha");

    kansha_command(root.path())
        .env("KANSHA_DIR", &data_dir)
        .args(["write", "-d", "2024-03-01", "Family"])
        .assert()
        .success();

    let mode = fs::metadata(&data_dir).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o700);
    let mode = fs::metadata(data_dir.join("preferences.json"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_unknown_log_format_env_is_rejected() {
    let dir = tempdir().unwrap();

    kansha_command(dir.path())
        .env("KANSHA_LOG_FORMAT", "yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("yaml"));
}
