//! Command-line behaviour of the `forensic-report` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

use forensic_report::ReportManifest;

#[rustfmt::skip]
const CASE_ARGS: &[&str] = &[
    "--case-number", "CR-7",
    "--investigator", "Dana Reyes",
    "--description", "Workstation triage",
    "--image-hash", "9f86d081884c7d65",
    "--acquisition-date", "2024-05-13",
    "--device-model", "Samsung 870 EVO",
    "--capacity", "1TB",
    "--fs-type", "NTFS",
    "--volume-label", "WINDOWS",
    "--fs-created", "2021-09-30",
    "--last-mounted", "2024-05-12",
    "--timeline", "2024-05-12 18:40,USB mass storage connected",
    "--no-open",
];

fn cmd(notable_file: &str, output: &Path) -> Command {
    let mut cmd = Command::cargo_bin("forensic-report").unwrap();
    cmd.args(CASE_ARGS)
        .args(["--notable-files", notable_file])
        .arg("--output")
        .arg(output);
    cmd
}

#[test]
fn generates_report_and_prints_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("case.pdf");

    cmd("q2.zip,C:/Users/dreyes/q2.zip,2254857830,2024-05-12", &out)
        .assert()
        .success()
        .stdout(contains(format!("Report generated: {}", out.display())));

    assert!(fs::read(&out).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn three_field_notable_file_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("case.pdf");

    cmd("q2.zip,C:/Users/dreyes/q2.zip,2254857830", &out)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Failed to generate the report"))
        .stderr(contains("expected 4"));

    assert!(!out.exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing-dir").join("case.pdf");

    cmd("a,b,c,d", &out)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Failed to write report to"));

    assert!(!out.exists());
}

#[test]
fn missing_required_flag_is_usage_error() {
    Command::cargo_bin("forensic-report")
        .unwrap()
        .args(["--case-number", "CR-7", "--no-open"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn manifest_is_written_and_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("case.pdf");
    let manifest_path = dir.path().join("case.json");

    cmd("a,b,c,d", &out)
        .arg("--manifest")
        .arg(&manifest_path)
        .assert()
        .success();

    let manifest: ReportManifest =
        serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert!(manifest.verify().unwrap());
    assert_eq!(
        manifest.report_sha256,
        forensic_report::sha256_hex(&fs::read(&out).unwrap())
    );
}

#[test]
fn manifest_failure_is_reported_as_manifest_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("case.pdf");
    let manifest_path = dir.path().join("missing-dir").join("case.json");

    cmd("a,b,c,d", &out)
        .arg("--manifest")
        .arg(&manifest_path)
        .assert()
        .failure()
        .code(1)
        .stdout(contains("Report generated:"))
        .stderr(contains("Failed to write manifest to"))
        .stderr(contains("Failed to write report to").not());

    assert!(out.exists());
}
