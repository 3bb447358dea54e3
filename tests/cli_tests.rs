//! Integration tests for the `mailthread` binary.
//!
//! Each run gets its own config file and cache directory so logging and
//! config lookups never touch the user's environment.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use assert_fs::prelude::*;
use predicates::prelude::*;

const CONVERSION: &str = "18c1234abcd5678";

fn store_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("store")
}

/// A sandbox with an isolated config file pointing the cache into itself.
fn sandbox() -> assert_fs::TempDir {
    let tmp = assert_fs::TempDir::new().unwrap();
    let cache = tmp.path().join("cache");
    tmp.child("config.toml")
        .write_str(&format!("[general]\ncache_dir = '{}'\n", cache.display()))
        .unwrap();
    tmp
}

fn mailthread(sandbox: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mailthread"));
    cmd.env("MAILTHREAD_CONFIG", sandbox.path().join("config.toml"))
        .env("MAILTHREAD_STORE", store_dir())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ─── search ─────────────────────────────────────────────────────────

#[test]
fn test_search_no_results() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["search", "no-such-term"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "No results found.\n");
}

#[test]
fn test_search_lists_matches() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["search", "conversion", "factors"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(predicate::str::starts_with("[1] 18c1234abcd5678 | Dec 11 |").eval(&stdout(&output)));
    assert!(predicate::str::contains("(3 messages, 2 attachments)").eval(&stdout(&output)));
}

#[test]
fn test_search_json() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["search", "--json", "-n", "1", "example"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result_count"], 1);
    assert_eq!(value["results"][0]["id"], CONVERSION);
}

#[test]
fn test_search_without_store_fails() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .env_remove("MAILTHREAD_STORE")
        .args(["search", "conversion"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(predicate::str::contains("No thread store configured").eval(&stderr(&output)));
}

// ─── download ───────────────────────────────────────────────────────

#[test]
fn test_download_requires_output_dir_for_attachments() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["download", CONVERSION])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(predicate::str::contains("specify --output-dir or use --no-attachments")
        .eval(&stderr(&output)));
}

#[test]
fn test_download_without_attachments() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["download", CONVERSION, "--no-attachments", "-m", "-r"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("Subject: Conversion factors\n"));
    assert!(text.contains("From: Bent Solheim <bent@example.com>\nTakk! Ser bra ut.\n"));
    assert!(text.find("--- Message 3").unwrap() < text.find("--- Message 1").unwrap());
    assert!(text.contains("- conversion_factors.xlsx (not downloaded)"));
}

#[test]
fn test_download_saves_attachments() {
    let tmp = sandbox();
    let out = tmp.child("attachments");
    let output = mailthread(&tmp)
        .args(["download", CONVERSION, "-o"])
        .arg(out.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    out.child("conversion_factors.xlsx")
        .assert(predicate::path::is_file());
    out.child("figures.pdf").assert(predicate::path::missing());

    let text = stdout(&output);
    assert!(text.contains("- conversion_factors.xlsx (saved to: "));
    assert!(text.contains("- figures.pdf (not downloaded)"));
}

#[test]
fn test_download_unknown_thread() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["download", "0000000000000000", "--no-attachments"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(predicate::str::contains("Thread not found").eval(&stderr(&output)));
}

// ─── strip ──────────────────────────────────────────────────────────

#[test]
fn test_strip_reads_stdin() {
    let tmp = sandbox();
    let mut child = mailthread(&tmp)
        .arg("strip")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Sounds good.\n\nOn Mon, Dec 8, 2025 at 2:30 PM Felipe <felipe@example.com> wrote:\n> old\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Sounds good.\n");
}

#[test]
fn test_strip_reads_file() {
    let tmp = sandbox();
    let body = tmp.child("body.txt");
    body.write_str("> only quoted\n").unwrap();

    let output = mailthread(&tmp).arg("strip").arg(body.path()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "[No new content - forwarded/quoted message only]\n"
    );
}

// ─── config / completions ───────────────────────────────────────────

#[test]
fn test_config_init_writes_file() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let config = tmp.child("nested").child("config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_mailthread"))
        .env("MAILTHREAD_CONFIG", config.path())
        .env_remove("RUST_LOG")
        .args(["config", "--init"])
        .output()
        .unwrap();
    assert!(output.status.success());

    config.assert(predicate::path::is_file());
    config.assert(predicate::str::contains("max_results = 25"));
}

#[test]
fn test_completions() {
    let tmp = sandbox();
    let output = mailthread(&tmp)
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(predicate::str::contains("mailthread").eval(&stdout(&output)));
}
