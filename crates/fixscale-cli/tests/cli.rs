// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixscale() -> Command {
    let mut cmd = Command::cargo_bin("fixscale").expect("binary built");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn encode_reports_the_stored_word_as_json() {
    let out = fixscale()
        .args([
            "encode",
            "-2",
            "--wordlength",
            "16",
            "--precision",
            "0",
            "--json",
        ])
        .output()
        .expect("runs");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["format"], "SignedDecimal");
    assert_eq!(report["hex"], "fffe");
    assert_eq!(report["bin"], "1111111111111110");
    assert_eq!(report["int"], "-2");
    assert_eq!(report["lower_bound"], "-32768");
    assert_eq!(report["upper_bound"], "32767");
}

#[test]
fn encode_prints_a_table_by_default() {
    fixscale()
        .args(["encode", "0.375", "--family", "binary", "--precision", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0x00000006"))
        .stdout(predicate::str::contains("0.375"));
}

#[test]
fn reject_policy_fails_with_the_range() {
    fixscale()
        .args([
            "encode",
            "70000",
            "--unsigned",
            "--wordlength",
            "16",
            "--precision",
            "0",
            "--overflow",
            "reject",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn garbage_input_is_refused() {
    fixscale()
        .args(["encode", "five"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot encode"));
}

#[test]
fn context_shows_both_defaults() {
    fixscale()
        .args(["context", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"wordlength\": 256"))
        .stdout(predicate::str::contains("\"precision\": 16"));
}

#[test]
fn saved_profile_shapes_later_runs() {
    let dir = TempDir::new().expect("tempdir");
    let config_dir = dir.path().to_str().expect("utf8 path");

    fixscale()
        .args([
            "--config-dir",
            config_dir,
            "profile",
            "save",
            "money",
            "--family",
            "decimal",
            "--wordlength",
            "64",
            "--precision",
            "2",
        ])
        .assert()
        .success();

    fixscale()
        .args(["--config-dir", config_dir, "profile", "show", "money"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"precision\": 2"));

    let out = fixscale()
        .args([
            "--config-dir",
            config_dir,
            "--profile",
            "money",
            "encode",
            "5.125",
            "--json",
        ])
        .output()
        .expect("runs");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["wordlength"], 64);
    assert_eq!(report["precision"], 2);
    assert_eq!(report["value"], "5.12");
}

#[test]
fn successive_saves_merge_one_family() {
    let dir = TempDir::new().expect("tempdir");
    let save = |extra: &[&str]| {
        fixscale()
            .arg("--config-dir")
            .arg(dir.path())
            .args(["profile", "save", "m", "--family", "decimal"])
            .args(extra)
            .assert()
            .success();
    };
    save(&["--precision", "2"]);
    save(&["--overflow", "reject"]);

    let out = fixscale()
        .arg("--config-dir")
        .arg(dir.path())
        .args(["profile", "show", "m"])
        .output()
        .expect("runs");
    assert!(out.status.success());
    let profile: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(profile["decimal"]["precision"], 2);
    assert_eq!(profile["decimal"]["overflow"], "reject");
}

#[test]
fn oversized_inputs_fail_fast() {
    fixscale()
        .args(["encode", "1e3000000000"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot encode"));

    fixscale()
        .args(["encode", "1", "--precision", "2000000000"])
        .assert()
        .failure();

    fixscale()
        .args(["encode", "1", "--wordlength", "0"])
        .assert()
        .failure();
}

#[test]
fn missing_profile_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    fixscale()
        .args(["--config-dir"])
        .arg(dir.path())
        .args(["--profile", "nope", "context"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile 'nope' not found"));
}
