//! Integration tests for the balance tracker CLI.
//!
//! These tests run the actual binary on command scripts and verify the
//! printed profile table and the store file it leaves behind.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given script against `store` and return stdout
fn run_tracker(script: &str, store: &Path) -> String {
    let mut cmd = Command::cargo_bin("balance-tracker").unwrap();
    let assert = cmd.arg(script).arg(store).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn lines(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn assert_matches_expected(script: &str, expected: &str) {
    let dir = TempDir::new().unwrap();
    let output = run_tracker(&test_data_path(script), &dir.path().join("store.json"));
    let expected = fs::read_to_string(test_data_path(expected)).unwrap();

    assert_eq!(lines(&output), lines(&expected));
}

#[test]
fn test_debit_flow() {
    assert_matches_expected("debit_flow.csv", "expected_debit_flow.csv");
}

#[test]
fn test_history_and_reorder() {
    assert_matches_expected("history_reorder.csv", "expected_history_reorder.csv");
}

#[test]
fn test_bad_rows_are_skipped() {
    assert_matches_expected("bad_rows.csv", "expected_bad_rows.csv");
}

#[test]
fn test_session_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store.json");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    fs::write(&first, "action,value\ncreate,Alice\ntopup,\"1,000\"\n").unwrap();
    fs::write(&second, "action,value\nundo,\ntopup,250\n").unwrap();

    run_tracker(first.to_str().unwrap(), &store);
    let output = run_tracker(second.to_str().unwrap(), &store);

    assert!(output.contains("0,Alice,250,0,true"));

    let saved = fs::read_to_string(&store).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&saved).unwrap();
    let record: serde_json::Value =
        serde_json::from_str(entries["balanceTrackerData"].as_str().unwrap()).unwrap();
    assert_eq!(record["currentProfileIndex"], 0);
    assert_eq!(record["profiles"][0]["balance"], "250");
    assert_eq!(record["lastTopUpAmount"], "250");
}

#[test]
fn test_corrupt_store_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store.json");
    fs::write(&store, "{ definitely not json").unwrap();

    let output = run_tracker(&test_data_path("debit_flow.csv"), &store);

    assert!(output.contains("0,BO12 - Alice,\"950,000\",0,true"));
}

#[test]
fn test_output_has_correct_header() {
    let dir = TempDir::new().unwrap();
    let output = run_tracker(
        &test_data_path("debit_flow.csv"),
        &dir.path().join("store.json"),
    );
    assert!(output.starts_with("index,name,balance,fee,active"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("balance-tracker").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("balance-tracker").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing command script"));
}
