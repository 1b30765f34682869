//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_taskmaster-cli"))
        .env("TASKMASTER_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn login(dir: &Path) {
    let (code, stdout, _) = run_cli(dir, &["login", "ada", "--password", "secret"]);
    assert_eq!(code, 0, "login failed");
    assert!(stdout.contains("Logged in as ada"));
}

fn add_task(dir: &Path, title: &str, due: &str, priority: &str) -> String {
    let (code, stdout, stderr) = run_cli(
        dir,
        &["task", "add", title, "--due", due, "--priority", priority],
    );
    assert_eq!(code, 0, "task add failed: {stderr}");
    stdout
        .trim()
        .strip_prefix("Task created: ")
        .expect("task id printed")
        .to_string()
}

#[test]
fn test_task_commands_require_login() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["task", "list"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Not logged in"));
}

#[test]
fn test_wrong_password_rejected() {
    let dir = TempDir::new().unwrap();
    login(dir.path());
    let (code, _, _) = run_cli(dir.path(), &["logout"]);
    assert_eq!(code, 0);
    let (code, _, stderr) = run_cli(dir.path(), &["login", "ada", "--password", "nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid credentials"));
}

#[test]
fn test_add_complete_and_history() {
    let dir = TempDir::new().unwrap();
    login(dir.path());

    let id = add_task(dir.path(), "Ship it", "2999-01-01T10:00:00Z", "high");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "list", "--json"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[0]["id"], id.as_str());
    assert_eq!(tasks[0]["status"], "pending");
    assert_eq!(tasks[0]["display_status"], "pending");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "complete", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("+12 points"), "unexpected output: {stdout}");

    // second completion is a no-op
    let (code, stdout, _) = run_cli(dir.path(), &["task", "complete", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Nothing to do"));

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "--json"]);
    assert_eq!(code, 0);
    let profile: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["points"], 12.0);
    assert_eq!(profile["tasksCompleted"], 1);
    assert_eq!(profile["username"], "ada");

    let (code, stdout, _) = run_cli(dir.path(), &["history", "--json"]);
    assert_eq!(code, 0);
    let history: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "completed");
}

#[test]
fn test_overdue_is_shown_for_past_due_tasks() {
    let dir = TempDir::new().unwrap();
    login(dir.path());
    add_task(dir.path(), "Old", "2000-01-01T00:00:00Z", "low");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[overdue] Old"));
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "log.level"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "warn");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "display.show_completed", "false"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "display.show_completed"]);
    assert_eq!(stdout.trim(), "false");

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "display.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_stats_shows_saved_rank() {
    use taskmaster_core::storage::keys;
    use taskmaster_core::{Database, KvStore, UserProfile};

    let dir = TempDir::new().unwrap();
    login(dir.path());

    let mut profile = UserProfile::new("ada", chrono::Utc::now());
    profile.points = 42.0;
    profile.rank = "Apprentice".to_string();
    {
        let db = Database::open_at(&dir.path().join("taskmaster.db")).unwrap();
        db.set(&keys::profile("ada"), &serde_json::to_string(&profile).unwrap())
            .unwrap();
    }

    let (code, stdout, _) = run_cli(dir.path(), &["stats"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Rank:       Apprentice"), "unexpected output: {stdout}");
}

#[test]
fn test_debug_log_names_dispatched_command() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_taskmaster-cli"))
        .env("TASKMASTER_DATA_DIR", dir.path())
        .env("RUST_LOG", "debug")
        .args(["whoami"])
        .output()
        .expect("Failed to execute CLI command");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dispatching"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("whoami"));
}
