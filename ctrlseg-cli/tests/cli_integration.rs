//! Integration tests for the ctrlseg CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn ctrlseg() -> Command {
    Command::cargo_bin("ctrlseg").unwrap()
}

#[test]
fn test_process_text_output() {
    ctrlseg()
        .args(["process", "-i", &fixture_path("requirements.md"), "--profile", "generic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== 1.2.7 ["))
        .stdout(predicate::str::contains("== 1.2.8 ["))
        .stdout(predicate::str::contains("== 2.3.1 ["))
        .stdout(predicate::str::contains("3 controls"));
}

#[test]
fn test_process_json_output() {
    let output = ctrlseg()
        .args([
            "process",
            "-i",
            &fixture_path("blocks.jsonl"),
            "--profile",
            "generic",
            "-f",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let documents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let document = &documents[0];
    assert!(document["source"].as_str().unwrap().ends_with("blocks.jsonl"));

    let controls = document["controls"].as_array().unwrap();
    assert_eq!(controls.len(), 2);
    let merged = controls
        .iter()
        .find(|c| c["identifier"] == "2.3.1")
        .unwrap();
    assert_eq!(merged["multi_table"], true);
    assert_eq!(merged["sources"], serde_json::json!(["table:1", "table:4"]));
    assert_eq!(document["report"]["controls_found"], 2);
}

#[test]
fn test_process_markdown_output() {
    ctrlseg()
        .args([
            "process",
            "-i",
            &fixture_path("requirements.md"),
            "--profile",
            "generic",
            "-f",
            "markdown",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("## 1.2.8"))
        .stdout(predicate::str::contains("*Total controls: 3*"));
}

#[test]
fn test_process_writes_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("artifacts");

    ctrlseg()
        .args(["process", "-i", &fixture_path("requirements.md"), "--profile", "generic", "-o"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("controls/1.2.7.json").is_file());
    assert!(out.join("controls/2.3.1.json").is_file());
    assert!(out.join("report.json").is_file());

    let chunks = fs::read_to_string(out.join("chunks.jsonl")).unwrap();
    let first: serde_json::Value = serde_json::from_str(chunks.lines().next().unwrap()).unwrap();
    assert_eq!(first["metadata"]["chunk_id"], "1.2.7#0");

    let control: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("controls/2.3.1.json")).unwrap()).unwrap();
    assert_eq!(control["multi_table"], "true");
}

#[test]
fn test_process_multiple_files_get_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("artifacts");

    ctrlseg()
        .args([
            "process",
            "-i",
            &fixture_path("requirements.md"),
            "-i",
            &fixture_path("blocks.jsonl"),
            "--profile",
            "generic",
            "--quiet",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("requirements/report.json").is_file());
    assert!(out.join("blocks/controls/2.3.2.json").is_file());
}

#[test]
fn test_strict_fails_on_degraded_document() {
    // The pci-dss profile expects far more controls than the fixture holds
    ctrlseg()
        .args(["process", "-i", &fixture_path("requirements.md"), "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_process_missing_file() {
    ctrlseg()
        .args(["process", "-i", "tests/fixtures/does-not-exist.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_process_unknown_profile() {
    ctrlseg()
        .args(["process", "-i", &fixture_path("requirements.md"), "--profile", "nist-800-53"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_cli_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ctrlseg.toml");
    fs::write(
        &config_path,
        "[processing]\ndefault_profile = \"generic\"\n\n[output]\npretty_json = false\n",
    )
    .unwrap();

    ctrlseg()
        .args(["process", "-i", &fixture_path("blocks.jsonl"), "-f", "json", "-c"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"profile\":\"generic\""));
}

#[test]
fn test_generate_then_validate_config() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("in-house.toml");

    ctrlseg()
        .args(["generate-config", "--code", "in-house", "--output"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration template generated successfully"));

    ctrlseg()
        .args(["validate", "--profile-config"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Profile code: in-house"));

    ctrlseg()
        .args(["process", "-i", &fixture_path("requirements.md"), "--profile-file"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("== 1.2.8 ["));
}

#[test]
fn test_validate_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(
        &config_path,
        "[metadata]\ncode = \"broken\"\nname = \"Broken\"\n\n[identifier]\npattern = '(\\d+'\n",
    )
    .unwrap();

    ctrlseg()
        .args(["validate", "--profile-config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_dedup_command() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("unique.json");

    ctrlseg()
        .args(["dedup", "-i", &fixture_path("mappings.json"), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("original: 6, removed: 3, final: 3"));

    let unique: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(
        unique,
        serde_json::json!([
            ["1.2.7", "maps_to", "CM-2"],
            ["1.2.8", "maps_to", "CM-6"],
            ["2.3.1", "maps_to", "IA-5"]
        ])
    );
}

#[test]
fn test_list_profiles() {
    ctrlseg()
        .args(["list", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pci-dss"))
        .stdout(predicate::str::contains("generic"));
}

#[test]
fn test_list_formats() {
    ctrlseg()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown"));
}
