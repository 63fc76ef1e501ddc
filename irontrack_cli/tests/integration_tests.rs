//! Integration tests for the irontrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Seeding and listing routines
//! - Running sessions against a persisted document
//! - Split rotation and log append across runs

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("irontrack"))
}

/// Parse the persisted document for the default user
fn read_document(data_dir: &Path) -> Value {
    let path = data_dir.join("users/default.json");
    let contents = std::fs::read_to_string(path).expect("document file missing");
    serde_json::from_str(&contents).expect("document is not valid JSON")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "IronTrack strength-training routine and session tracker",
        ));
}

#[test]
fn test_status_with_fresh_document() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhuma rotina ativa"));
}

#[test]
fn test_seed_creates_and_activates_routine() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("routines")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC Hipertrofia [ATIVA]"));

    let doc = read_document(temp_dir.path());
    assert_eq!(doc["routines"].as_array().unwrap().len(), 1);
    assert!(doc["activeRoutineId"].is_string());
    assert_eq!(doc["routines"][0]["splits"].as_array().unwrap().len(), 3);
}

#[test]
fn test_seed_is_idempotent() {
    let temp_dir = setup_test_dir();

    for _ in 0..2 {
        cli()
            .arg("seed")
            .arg("--data-dir")
            .arg(temp_dir.path())
            .assert()
            .success();
    }

    let doc = read_document(temp_dir.path());
    assert_eq!(doc["routines"].as_array().unwrap().len(), 1);
}

#[test]
fn test_start_without_routine_reports_cleanly() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Não foi possível iniciar o treino"));
}

#[test]
fn test_auto_complete_session_appends_log_and_rotates() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("start")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("finalizado"));

    let doc = read_document(temp_dir.path());
    let logs = doc["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["splitName"], "A");
    assert_eq!(logs[0]["exercises"].as_array().unwrap().len(), 3);
    // Every seeded set was marked complete before finishing
    for exercise in logs[0]["exercises"].as_array().unwrap() {
        for set in exercise["sets"].as_array().unwrap() {
            assert_eq!(set["completed"], true);
        }
    }
    assert_eq!(doc["routines"][0]["currentSplitIndex"], 1);
}

#[test]
fn test_rotation_wraps_after_full_cycle() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    for _ in 0..3 {
        cli()
            .arg("start")
            .arg("--auto-complete")
            .arg("--data-dir")
            .arg(temp_dir.path())
            .assert()
            .success();
    }

    let doc = read_document(temp_dir.path());
    assert_eq!(doc["logs"].as_array().unwrap().len(), 3);
    // A → B → C → back to A
    assert_eq!(doc["routines"][0]["currentSplitIndex"], 0);
    let split_names: Vec<&str> = doc["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["splitName"].as_str().unwrap())
        .collect();
    assert_eq!(split_names, vec!["A", "B", "C"]);
}

#[test]
fn test_second_session_carries_forward_performance() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("start")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let doc = read_document(temp_dir.path());
    let entry = &doc["routines"][0]["splits"][0]["exercises"][0];
    let last = &entry["lastPerformance"];
    assert!(last["date"].is_string());
    assert!(!last["sets"].as_array().unwrap().is_empty());
}

#[test]
fn test_activate_unknown_routine_is_safe() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("activate")
        .arg("ghost-id")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("não encontrada"));

    let doc = read_document(temp_dir.path());
    assert!(doc["activeRoutineId"].is_string());
}

#[test]
fn test_progress_after_sessions() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("start")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // Split A contains def_01 (Supino Reto com Barra)
    cli()
        .arg("progress")
        .arg("def_01")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Progresso - Supino Reto com Barra"));

    // An exercise never trained reports no records
    cli()
        .arg("progress")
        .arg("def_20")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum registro"));
}

#[test]
fn test_documents_are_isolated_per_user() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("seed")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--user")
        .arg("maria")
        .assert()
        .success();

    cli()
        .arg("routines")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--user")
        .arg("joao")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhuma rotina criada"));

    assert!(temp_dir.path().join("users/maria.json").exists());
    assert!(!temp_dir.path().join("users/joao.json").exists());
}
