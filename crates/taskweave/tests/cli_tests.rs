//! Integration tests for the taskweave CLI.
//!
//! These tests run the built binary against a temporary repository.

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{create_task, run_json, run_taskweave_in_dir, status_of};

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides a temporary directory with an initialized repository
#[fixture]
fn initialized_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let output = run_taskweave_in_dir(temp.path(), &["init", "--quiet"]);
    assert!(
        output.status.success(),
        "Failed to initialize taskweave: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    temp
}

#[rstest]
fn test_help_lists_commands(temp_dir: TempDir) {
    let output = run_taskweave_in_dir(temp_dir.path(), &["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["init", "create", "list", "show", "update", "delete", "dep", "check"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[rstest]
fn test_init_creates_repository(temp_dir: TempDir) {
    let output = run_taskweave_in_dir(temp_dir.path(), &["init"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initialized taskweave"));
    assert!(temp_dir.path().join(".taskweave/config.yaml").is_file());
    assert!(temp_dir.path().join(".taskweave/tasks.jsonl").is_file());
}

#[rstest]
fn test_init_twice_fails(initialized_dir: TempDir) {
    let output = run_taskweave_in_dir(initialized_dir.path(), &["init"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already initialized"));
}

#[rstest]
fn test_commands_require_repository(temp_dir: TempDir) {
    let output = run_taskweave_in_dir(temp_dir.path(), &["list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not a taskweave repository"));
}

#[rstest]
fn test_create_and_list(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    assert_eq!(create_task(dir, "First"), 1);
    assert_eq!(create_task(dir, "Second"), 2);

    let listed = run_json(dir, &["list"]);
    let titles: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    let text = run_taskweave_in_dir(dir, &["list"]);
    assert!(String::from_utf8_lossy(&text.stdout).contains("Found 2 task(s)"));
}

#[rstest]
fn test_dep_add_rejects_cycle_with_path(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    for title in ["A", "B", "C"] {
        create_task(dir, title);
    }
    run_json(dir, &["dep", "add", "1", "2"]);
    run_json(dir, &["dep", "add", "2", "3"]);

    let output = run_taskweave_in_dir(dir, &["--json", "dep", "add", "3", "1"]);

    assert!(!output.status.success());
    let rejection: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rejection,
        serde_json::json!({"error": "Circular dependency detected", "path": [3, 1, 2, 3]})
    );
    let deps = run_json(dir, &["dep", "list", "3"]);
    assert_eq!(deps, serde_json::json!([]));
}

#[rstest]
fn test_dep_add_rejects_self_dependency(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    create_task(dir, "Lonely");

    let output = run_taskweave_in_dir(dir, &["dep", "add", "1", "1"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot depend on itself"));
}

#[rstest]
fn test_check_is_a_dry_run(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    create_task(dir, "A");
    create_task(dir, "B");
    run_json(dir, &["dep", "add", "1", "2"]);

    let cycle = run_json(dir, &["check", "2", "1"]);
    assert_eq!(cycle["path"], serde_json::json!([2, 1, 2]));

    let ok = run_json(dir, &["check", "1", "2"]);
    assert_eq!(ok["is_cycle"], serde_json::json!(false));

    let reverse = run_json(dir, &["dep", "list", "1", "--reverse"]);
    assert_eq!(reverse, serde_json::json!([]));
}

#[rstest]
fn test_update_status_cascades(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    for title in ["Release", "Build", "Compile"] {
        create_task(dir, title);
    }
    run_json(dir, &["dep", "add", "1", "2"]);
    run_json(dir, &["dep", "add", "2", "3"]);

    let result = run_json(dir, &["update", "3", "--status", "blocked"]);

    let changed: Vec<_> = result["changes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["task_id"].as_u64().unwrap(), c["to"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        changed,
        vec![
            (3, "blocked".to_string()),
            (2, "blocked".to_string()),
            (1, "blocked".to_string()),
        ]
    );
    assert_eq!(status_of(dir, 1), "blocked");
}

#[rstest]
fn test_completion_makes_dependent_ready(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    create_task(dir, "Ship");
    create_task(dir, "Test");
    run_json(dir, &["dep", "add", "1", "2"]);

    let output = run_taskweave_in_dir(dir, &["update", "2", "--status", "completed"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#1 pending -> in_progress"));
    assert_eq!(status_of(dir, 1), "in_progress");
}

#[rstest]
fn test_update_without_fields_fails(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    create_task(dir, "Idle");

    let output = run_taskweave_in_dir(dir, &["update", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to update"));
}

#[rstest]
fn test_show_reports_both_directions(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    for title in ["Top", "Middle", "Bottom"] {
        create_task(dir, title);
    }
    run_json(dir, &["dep", "add", "1", "2"]);
    run_json(dir, &["dep", "add", "2", "3"]);

    let shown = run_json(dir, &["show", "2"]);

    assert_eq!(shown[0]["dependencies"][0]["depends_on_id"], 3);
    assert_eq!(shown[0]["dependents"], serde_json::json!([1]));
}

#[rstest]
fn test_show_unknown_task_fails(initialized_dir: TempDir) {
    let output = run_taskweave_in_dir(initialized_dir.path(), &["show", "42"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Task not found: 42"));
}

#[rstest]
fn test_delete_unblocks_dependent(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    create_task(dir, "Dependent");
    create_task(dir, "Blocker");
    create_task(dir, "Done");
    run_json(dir, &["update", "2", "--status", "blocked"]);
    run_json(dir, &["update", "3", "--status", "completed"]);
    run_json(dir, &["dep", "add", "1", "2"]);
    run_json(dir, &["dep", "add", "1", "3"]);
    assert_eq!(status_of(dir, 1), "blocked");

    let result = run_json(dir, &["delete", "2"]);

    assert_eq!(result["changes"][0]["task_id"], 1);
    assert_eq!(status_of(dir, 1), "in_progress");
    assert_eq!(run_json(dir, &["dep", "list", "1"]), serde_json::json!([3]));
}

#[rstest]
fn test_dep_remove(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    create_task(dir, "A");
    create_task(dir, "B");
    run_json(dir, &["dep", "add", "1", "2"]);

    run_json(dir, &["dep", "remove", "1", "2"]);
    assert_eq!(run_json(dir, &["dep", "list", "1"]), serde_json::json!([]));

    let again = run_taskweave_in_dir(dir, &["dep", "remove", "1", "2"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("Dependency not found"));
}
