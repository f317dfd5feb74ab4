//! CLI-level tests driving the compiled binary against temporary registries.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn mcpreg() -> Command {
    Command::cargo_bin("mcpreg").expect("binary should build")
}

fn fixture(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("registry.json");
    fs::write(&path, content).expect("Failed to write registry fixture");
    path
}

#[test]
fn add_then_list_shows_entry() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("registry.json");

    mcpreg()
        .args(["add", "--file"])
        .arg(&path)
        .arg(r#"{"servers": {"fetch": {"command": "npx", "args": ["-y", "fetch-server"]}}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to"));

    mcpreg()
        .args(["list", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch").and(predicate::str::contains("npx")));
}

#[test]
fn add_reads_fragment_from_stdin() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("registry.json");

    mcpreg()
        .args(["add", "--file"])
        .arg(&path)
        .write_stdin(r#"{"servers": {"db": {"command": "db-server"}}}"#)
        .assert()
        .success();

    let value: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert!(value.get("servers").and_then(|s| s.get("db")).is_some());
}

#[test]
fn add_rejects_invalid_json() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("registry.json");

    mcpreg()
        .args(["add", "--file"])
        .arg(&path)
        .arg("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));

    assert!(!path.exists());
}

#[test]
fn merge_canonicalizes_concatenated_objects() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(
        &dir,
        "{\"servers\": {\"a\": {\"command\": \"one\"}}}\n\n{\"servers\": {\"b\": {\"command\": \"two\"}}}",
    );

    mcpreg()
        .arg("merge")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 server entries"));

    let value: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    let names: Vec<&String> =
        value.get("servers").and_then(Value::as_object).expect("servers").keys().collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn remove_with_yes_deletes_entry() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(&dir, r#"{"servers": {"a": {"command": "x"}, "b": {"command": "y"}}}"#);

    mcpreg()
        .args(["remove", "a", "--yes", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'a'"));

    let value: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert!(value.get("servers").and_then(|s| s.get("a")).is_none());
    assert!(value.get("servers").and_then(|s| s.get("b")).is_some());
}

#[test]
fn remove_unknown_name_fails_and_keeps_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(&dir, r#"{"servers": {"a": {"command": "x"}}}"#);
    let before = fs::read_to_string(&path).expect("read");

    mcpreg()
        .args(["remove", "missing", "--yes", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert_eq!(fs::read_to_string(&path).expect("read"), before);
}

#[test]
fn move_updates_order() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(&dir, r#"{"servers": {"a": {}, "b": {}, "c": {}}}"#);

    mcpreg()
        .args(["move", "c", "up", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("a, c, b"));
}

#[test]
fn move_first_up_reports_failure() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(&dir, r#"{"servers": {"a": {}, "b": {}}}"#);
    let before = fs::read_to_string(&path).expect("read");

    mcpreg()
        .args(["move", "a", "up", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("boundary"));

    assert_eq!(fs::read_to_string(&path).expect("read"), before);
}

#[test]
fn list_with_query_filters_entries() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(
        &dir,
        r#"{"servers": {"fetch": {"command": "npx"}, "db": {"command": "db-server"}}}"#,
    );

    mcpreg()
        .args(["list", "--query", "FETCH", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch").and(predicate::str::contains("db").not()));
}

#[test]
fn backup_flag_creates_timestamped_copy() {
    let dir = TempDir::new().expect("tempdir");
    let path = fixture(&dir, r#"{"servers": {"a": {"command": "x"}}}"#);

    mcpreg()
        .args(["remove", "a", "--yes", "--backup", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created backup"));

    let backups: Vec<_> = fs::read_dir(dir.path())
        .expect("read_dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
        .collect();
    assert_eq!(backups.len(), 1);
}
