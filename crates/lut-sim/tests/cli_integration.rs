//! Integration tests for the lut-sim CLI.

#![allow(clippy::pedantic, clippy::nursery)]

use clap as _;
use lut_core as _;
use lut_sim as _;
use serde as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

fn lut_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lut-sim"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run lut-sim")
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn demo_prints_reference_probe_lines() {
    let output = lut_sim(&["demo"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Lookup: 0x6 -> 0xeb (binary: 11101011)"));
    assert!(stdout.contains("Lookup: 0x1 -> 0xff (binary: 11111111)"));
    assert!(stdout.contains("Completed 108 accesses"));
}

#[test]
fn demo_json_report_parses() {
    let output = lut_sim(&["demo", "--mode", "timing", "--latency", "3", "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "timing");
    assert_eq!(report["latency"], 3);
    assert_eq!(report["completions"].as_array().unwrap().len(), 108);
    assert_eq!(report["final_tick"], 3 * 108);
    assert_eq!(report["stats"]["hits"], 108);
}

#[test]
fn run_executes_scenario_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(
        temp_dir.path(),
        "scenario.json",
        r#"{
            "device": { "latency": 2, "entries": [ { "key": 4, "value": 77 } ] },
            "requests": [ { "offset": 4 }, { "offset": 5 }, { "offset": 4, "kind": "write", "value": 1 } ],
            "backpressure": { "reject_first": 1, "retry_delay": 1 }
        }"#,
    );

    let output = lut_sim(&["run", scenario.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let completions = report["completions"].as_array().unwrap();
    assert_eq!(completions.len(), 3);
    assert_eq!(completions[0]["payload"], 77);
    assert_eq!(completions[1]["payload"], 0);
    assert!(completions[2]["payload"].is_null());
    assert_eq!(report["stats"]["responses_rejected"], 3);
}

#[test]
fn run_mode_flag_overrides_scenario() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(
        temp_dir.path(),
        "scenario.json",
        r#"{ "mode": "timing", "requests": [ { "offset": 2 } ] }"#,
    );

    let output = lut_sim(&["run", scenario.to_str().unwrap(), "--mode", "functional"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("(functional mode)"));
    assert!(stdout.contains("Lookup: 0x2 -> 0xaf (binary: 10101111)"));
}

#[test]
fn missing_scenario_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("absent.json");

    let output = lut_sim(&["run", missing.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn invalid_device_configuration_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(
        temp_dir.path(),
        "dup.json",
        r#"{ "device": { "entries": [ { "key": 1, "value": 1 }, { "key": 1, "value": 2 } ] } }"#,
    );

    let output = lut_sim(&["run", scenario.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is defined more than once"));
}

#[test]
fn malformed_json_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(temp_dir.path(), "bad.json", "{ not json");

    let output = lut_sim(&["run", scenario.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid scenario"));
}

#[test]
fn oversized_request_fails_without_panicking() {
    let temp_dir = tempfile::tempdir().unwrap();
    let scenario = create_temp_file(
        temp_dir.path(),
        "wide.json",
        r#"{ "mode": "timing", "requests": [ { "offset": 6, "size": 8 } ] }"#,
    );

    let output = lut_sim(&["run", scenario.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("request 0 accesses 8 bytes, more than the 4-byte lookup value"));
    assert!(!stderr.contains("panicked"));
}
