//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the taskweave binary in the specified directory.
pub fn run_taskweave_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskweave"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute taskweave binary")
}

/// Run with `--json` and parse stdout, asserting success.
pub fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_taskweave_in_dir(dir, &full);
    assert!(
        output.status.success(),
        "taskweave {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}

/// Create a task and return its ID.
pub fn create_task(dir: &Path, title: &str) -> u64 {
    run_json(dir, &["create", "--title", title])["id"]
        .as_u64()
        .expect("created task has a numeric id")
}

/// Current status of a task as its wire name.
pub fn status_of(dir: &Path, id: u64) -> String {
    let shown = run_json(dir, &["show", &id.to_string()]);
    shown[0]["status"]
        .as_str()
        .expect("status is a string")
        .to_string()
}
