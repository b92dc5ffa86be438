use fs2::FileExt;
use predicates::prelude::*;
use std::fs::OpenOptions;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::kansha_command;

/// Another process holding the preference lock makes setting writes fail fast,
/// and the failure is reported exactly once.
#[test]
fn test_profile_write_fails_while_lock_held() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.path().join("preferences.lock"))?;
    lock.try_lock_exclusive()?;

    let output = kansha_command(dir.path())
        .args(["profile", "set", "--name", "Aki"])
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("kansha failed").count(),
        1,
        "expected a single logged failure, got: {}",
        stderr
    );
    assert!(stderr.contains("Lock(FileBusy"), "stderr was: {}", stderr);

    lock.unlock()?;
    Ok(())
}

/// Entry writes never fail the command: the store logs the rejected write and
/// keeps going.
#[test]
fn test_entry_write_survives_held_lock() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.path().join("preferences.lock"))?;
    lock.try_lock_exclusive()?;

    kansha_command(dir.path())
        .args(["write", "-d", "2024-03-01", "Family"])
        .assert()
        .success()
        .stdout("Saved 2024-03-01\n")
        .stderr(predicate::str::contains("Failed to persist entry store"));

    lock.unlock()?;

    kansha_command(dir.path())
        .args(["show", "-d", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing recorded for this day yet."));
    Ok(())
}
