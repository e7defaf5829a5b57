//! End-to-end runs of the `curvefeed` binary against quote files.

use assert_cmd::Command;
use predicates::prelude::*;

fn curvefeed() -> Command {
    let mut cmd = Command::cargo_bin("curvefeed").unwrap();
    cmd.env_remove("CURVEFEED_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn quote_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("quotes.json");
    std::fs::write(
        &path,
        r#"{"success": true, "data": {"securitiesData": [
            {"security": "EURUSD Curncy", "success": true, "fields": {"PX_LAST": 1.0850}},
            {"security": "EURUSD1M Curncy", "success": true, "fields": {"PX_LAST": 9.8}},
            {"security": "EURUSD3M Curncy", "success": true, "fields": {"PX_LAST": "29.5"}}
        ]}}"#,
    )
    .unwrap();
    path
}

#[test]
fn test_catalog_list_json() {
    curvefeed()
        .args(["catalog", "list", "--category", "em-asia", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USDINR"))
        .stdout(predicate::str::contains("EURUSD").not());
}

#[test]
fn test_resolve_respects_ndf_max_tenor() {
    curvefeed()
        .args(["resolve", "USDINR", "--ladder", "1M,1Y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IRN1M Curncy"))
        .stdout(predicate::str::contains("IRN1Y Curncy").not());
}

#[test]
fn test_curve_from_quote_file() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = quote_file(&dir);

    let output = curvefeed()
        .args(["curve", "eurusd", "--ladder", "1M,3M", "--format", "json", "--quotes"])
        .arg(&quotes)
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let points = snapshot["curves"]["EURUSD"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["isAnchor"], true);
    let rate = points[1]["derivedRate"].as_f64().unwrap();
    assert!((rate - 1.08598).abs() < 1e-9);
}

#[test]
fn test_unknown_identifier_fails() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = quote_file(&dir);

    curvefeed()
        .args(["curve", "XXXYYY", "--quotes"])
        .arg(&quotes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("XXXYYY"));
}

#[test]
fn test_bad_ladder_rejected() {
    curvefeed()
        .args(["resolve", "EURUSD", "--ladder", "1M,soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ladder"));
}

#[test]
fn test_non_ascii_ladder_rejected_without_panic() {
    curvefeed()
        .args(["resolve", "EURUSD", "--ladder", "1M,3é"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ladder"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_ndf_check_reports_working_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ndf.json");
    std::fs::write(
        &path,
        r#"{"success": true, "data": {"securities_data": [
            {"security": "IRN1M Curncy", "success": true, "fields": {"PX_LAST": 0.21}},
            {"security": "IRN3M Curncy", "success": true, "fields": {"PX_LAST": 0.55}},
            {"security": "USDINR1M Curncy", "success": false}
        ]}}"#,
    )
    .unwrap();

    let output = curvefeed()
        .args(["ndf-check", "usdinr", "--ladder", "1M,3M", "--format", "json", "--quotes"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["format"], "IRN{tenor} Curncy");
    assert_eq!(rows[0]["quoted"], "2/2");
    assert_eq!(rows[0]["longest"], "3M");
    assert_eq!(rows[0]["status"], "working, catalog");
    assert_eq!(rows[1]["quoted"], "0/2");
}

#[test]
fn test_ndf_check_rejects_format_without_tenor() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = quote_file(&dir);

    curvefeed()
        .args(["ndf-check", "USDINR", "--formats", "IRN Curncy", "--quotes"])
        .arg(&quotes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("{tenor}"));
}
