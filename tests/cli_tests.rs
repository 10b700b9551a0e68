//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn voice_loop_bin() -> Command {
    Command::cargo_bin("voice-loop").expect("binary exists")
}

/// A command pointed at an isolated config directory
fn with_config_dir(dir: &TempDir) -> Command {
    let mut cmd = voice_loop_bin();
    cmd.env("HOME", dir.path());
    cmd.env("XDG_CONFIG_HOME", dir.path());
    cmd
}

#[test]
fn help_shows_about() {
    voice_loop_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice chat"));
}

#[test]
fn invalid_max_duration_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["--max-duration", "notaduration"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid max-duration"));
}

#[test]
fn closed_stdin_exits_cleanly() {
    // With stdin at EOF the chat loop ends before touching mic or network
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Press Enter to talk."));
}

#[test]
fn quit_command_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .write_stdin("q\n")
        .assert()
        .success();
}

#[test]
fn session_and_server_are_announced() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["-s", "http://agent.local:5000", "-S", "my-session"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("my-session"))
        .stderr(predicate::str::contains("http://agent.local:5000"));
}

#[test]
fn config_init_creates_file() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config file created"));
}

#[test]
fn config_init_twice_fails() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "init"])
        .assert()
        .success();

    with_config_dir(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_set_then_get_round_trips() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "set", "session_id", "round-trip"])
        .assert()
        .success();

    with_config_dir(&dir)
        .args(["config", "get", "session_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("round-trip"));
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_max_duration_fails() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "set", "max_duration", "invalid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn config_set_invalid_server_url_fails() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "set", "server_url", "agent.local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http"));
}

#[test]
fn config_set_invalid_boolean_fails() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "set", "playback", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("true"));
}

#[test]
fn config_list_with_no_file_shows_not_set() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn config_path_prints_location() {
    let dir = TempDir::new().unwrap();
    with_config_dir(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
