#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `kansha` binary with a clean environment whose
/// data directory is `data_dir`. Colors are off because stdout is not a terminal.
pub fn kansha_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kansha").expect("kansha binary not built");
    cmd.env_clear()
        .env("HOME", data_dir)
        .env("KANSHA_DIR", data_dir);
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd
}

/// Reads the preference document written by the binary.
pub fn read_preferences(data_dir: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(data_dir.join("preferences.json"))
        .expect("preferences.json should exist");
    serde_json::from_str(&text).expect("preferences.json should be JSON")
}
