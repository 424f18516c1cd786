//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomotask"))
        .args(args)
        .env("POMOTASK_DATA_DIR", dir.path())
        .env_remove("POMOTASK_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command and expect success.
fn run_cli_success(dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

fn list_json(dir: &TempDir, args: &[&str]) -> Vec<serde_json::Value> {
    let mut full = vec!["task", "list", "--json"];
    full.extend_from_slice(args);
    let stdout = run_cli_success(dir, &full);
    serde_json::from_str(&stdout).expect("task list is not JSON")
}

fn titles(tasks: &[serde_json::Value]) -> Vec<&str> {
    tasks.iter().map(|t| t["title"].as_str().unwrap()).collect()
}

#[test]
fn test_task_add_and_list() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(&dir, &["task", "add", "  Write report  "]);
    assert!(out.contains("Task added:"));
    run_cli_success(&dir, &["task", "add", "Review PR"]);

    let tasks = list_json(&dir, &[]);
    assert_eq!(titles(&tasks), vec!["Review PR", "Write report"]);
    assert_eq!(tasks[0]["completed"], false);
    assert_eq!(tasks[0]["pomodorosCompleted"], 0);

    let text = run_cli_success(&dir, &["task", "list"]);
    assert!(text.contains("[ ]"));
    assert!(text.contains("Review PR"));
}

#[test]
fn test_blank_title_rejected() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
    assert!(list_json(&dir, &["--all"]).is_empty());
}

#[test]
fn test_toggle_moves_task_to_completed() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["task", "add", "Ship it"]);
    let id = list_json(&dir, &[])[0]["id"].as_str().unwrap().to_string();

    let out = run_cli_success(&dir, &["task", "toggle", &id[..8]]);
    assert!(out.contains("completed"));
    assert!(list_json(&dir, &[]).is_empty());

    let done = list_json(&dir, &["--completed"]);
    assert_eq!(titles(&done), vec!["Ship it"]);
    assert!(done[0]["completedAt"].is_i64());

    let out = run_cli_success(&dir, &["task", "clear"]);
    assert!(out.contains("Removed 1"));
    assert!(list_json(&dir, &["--all"]).is_empty());
}

#[test]
fn test_edit_and_delete() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["task", "add", "Draft"]);
    let id = list_json(&dir, &[])[0]["id"].as_str().unwrap().to_string();

    run_cli_success(&dir, &["task", "edit", &id, "Final"]);
    assert_eq!(titles(&list_json(&dir, &[])), vec!["Final"]);

    run_cli_success(&dir, &["task", "delete", &id]);
    assert!(list_json(&dir, &["--all"]).is_empty());

    let (_, stderr, code) = run_cli(&dir, &["task", "delete", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("task not found"));
}

#[test]
fn test_move_and_reorder() {
    let dir = TempDir::new().unwrap();
    for title in ["c", "b", "a"] {
        run_cli_success(&dir, &["task", "add", title]);
    }
    assert_eq!(titles(&list_json(&dir, &[])), vec!["a", "b", "c"]);

    run_cli_success(&dir, &["task", "move", "1", "3"]);
    assert_eq!(titles(&list_json(&dir, &[])), vec!["b", "c", "a"]);

    let (_, _, code) = run_cli(&dir, &["task", "move", "0", "2"]);
    assert_eq!(code, 1);

    let tasks = list_json(&dir, &[]);
    let ids: Vec<&str> = tasks.iter().rev().map(|t| t["id"].as_str().unwrap()).collect();
    let mut args = vec!["task", "reorder"];
    args.extend(ids.iter().copied());
    run_cli_success(&dir, &args);
    assert_eq!(titles(&list_json(&dir, &[])), vec!["a", "c", "b"]);

    let (_, stderr, code) = run_cli(&dir, &["task", "reorder", ids[0]]);
    assert_eq!(code, 1);
    assert!(stderr.contains("expected all 3 active tasks"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(&dir, &["config", "get", "timer.workDuration"]).trim(), "25");

    run_cli_success(&dir, &["config", "set", "timer.workDuration", "50"]);
    assert_eq!(run_cli_success(&dir, &["config", "get", "timer.workDuration"]).trim(), "50");

    run_cli_success(&dir, &["config", "theme", "Midnight"]);
    assert_eq!(run_cli_success(&dir, &["config", "get", "theme"]).trim(), "midnight");

    let list: serde_json::Value =
        serde_json::from_str(&run_cli_success(&dir, &["config", "list"])).unwrap();
    assert_eq!(list["timer"]["workDuration"], 50);
    assert_eq!(list["timer"]["autoStartBreak"], true);

    run_cli_success(&dir, &["config", "reset"]);
    assert_eq!(run_cli_success(&dir, &["config", "get", "theme"]).trim(), "tomato");
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli(&dir, &["config", "set", "timer.workDuration", "0"]).2, 1);
    assert_eq!(run_cli(&dir, &["config", "set", "timer.workDuration", "soon"]).2, 1);
    assert_eq!(run_cli(&dir, &["config", "get", "volume"]).2, 1);
    assert_eq!(run_cli(&dir, &["config", "theme", "neon"]).2, 1);
    assert_eq!(run_cli_success(&dir, &["config", "get", "timer.workDuration"]).trim(), "25");
}

#[test]
fn test_stats_start_empty() {
    let dir = TempDir::new().unwrap();
    let stats: serde_json::Value =
        serde_json::from_str(&run_cli_success(&dir, &["stats", "show", "--json"])).unwrap();
    assert_eq!(stats["today"], 0);
    assert_eq!(stats["streak"], 0);

    let out = run_cli_success(&dir, &["stats", "reset"]);
    assert!(out.contains("reset"));
}

#[test]
fn test_dashboard_json() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["task", "add", "one"]);
    run_cli_success(&dir, &["task", "add", "two"]);
    let id = list_json(&dir, &[])[0]["id"].as_str().unwrap().to_string();
    run_cli_success(&dir, &["task", "toggle", &id]);

    let dash: serde_json::Value =
        serde_json::from_str(&run_cli_success(&dir, &["dashboard", "--json"])).unwrap();
    assert_eq!(dash["tasks_created_today"], 2);
    assert_eq!(dash["tasks_completed_today"], 1);
    assert_eq!(dash["completion_pct"], 50);
    assert_eq!(dash["active_tasks"], 1);
    assert_eq!(dash["pomodoros_today"], 0);
    assert_eq!(dash["total_pomodoros"], 0);
}

#[test]
fn test_timer_run_exits_when_stdin_closes() {
    let dir = TempDir::new().unwrap();
    run_cli_success(&dir, &["task", "add", "Focus"]);
    let id = list_json(&dir, &[])[0]["id"].as_str().unwrap().to_string();

    let out = run_cli_success(&dir, &["timer", "run", "--task", &id, "--json"]);
    let events: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("event line is not JSON"))
        .collect();
    assert_eq!(events[0]["type"], "timer_started");
    assert_eq!(events[0]["mode"], "work");
    assert_eq!(events[0]["task_id"], id.as_str());
    assert_eq!(events.last().unwrap()["type"], "timer_paused");
}

#[test]
fn test_timer_run_unknown_task() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["timer", "run", "--task", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("task not found"));
}
