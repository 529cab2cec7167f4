//! Integration tests for top-level CLI behavior.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Nothing listens on the discard port, so backend calls fail fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:9/api/";

fn neighborly() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_neighborly"));
    command
        .env("NEIGHBORLY_API_URL", UNREACHABLE_API)
        .env("NEIGHBORLY_REDIRECT_DELAY_MS", "0")
        .env_remove("NEIGHBORLY_API_TOKEN")
        .env_remove("NEIGHBORLY_PHOTO_LIMIT");
    command
}

fn run_neighborly(args: &[&str]) -> Output {
    neighborly().args(args).output().expect("failed to run neighborly binary")
}

fn run_with_stdin(command: &mut Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run neighborly binary");
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_neighborly(&["frobnicate"]);
    assert!(!output.status.success());
}

#[test]
fn create_help_lists_flags() {
    let output = run_neighborly(&["create", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--draft"));
    assert!(stdout.contains("--photo"));
}

#[test]
fn missing_draft_is_reported() {
    let output = run_neighborly(&["create", "--draft", "/nonexistent/draft.yaml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to read draft"), "stderr: {stderr}");
}

#[test]
fn invalid_photo_limit_is_reported() {
    let output = neighborly()
        .env("NEIGHBORLY_PHOTO_LIMIT", "0")
        .arg("categories")
        .output()
        .expect("failed to run neighborly binary");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("NEIGHBORLY_PHOTO_LIMIT"), "stderr: {stderr}");
}

#[test]
fn categories_against_unreachable_backend_fails() {
    let output = run_neighborly(&["categories"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to load categories"), "stderr: {stderr}");
}

#[test]
fn anonymous_create_asks_for_sign_in() {
    let output = run_with_stdin(neighborly().arg("create"), "quit\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("sign in"), "stderr: {stderr}");
}

#[test]
fn interactive_create_can_be_abandoned() {
    let output = run_with_stdin(
        neighborly().env("NEIGHBORLY_API_TOKEN", "token").arg("create"),
        "title Walk my dog\nshow\nquit\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Step 1/4"));
    assert!(stdout.contains("Title:       Walk my dog"));
    assert!(stdout.contains("not submitted"));
}
