use std::path::Path;

use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn cargo_bin(data_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("catalog").unwrap();
    cmd.env_remove("CATALOG_CALLER")
        .env_remove("CATALOG_RECORD")
        .env("CATALOG_DATA_DIR", data_dir)
        .env("RUST_LOG", "off");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Set up a record and return (record, admin) as strings.
fn set_up(data_dir: &Path) -> (String, String) {
    let output = cargo_bin(data_dir).arg("setup").output().unwrap();
    assert!(output.status.success());
    let view = stdout_json(&output);
    (
        view["record"].as_str().unwrap().to_string(),
        view["admin"].as_str().unwrap().to_string(),
    )
}

#[test]
fn setup_prints_empty_catalog() {
    let dir = tempdir().unwrap();
    let output = cargo_bin(dir.path()).arg("setup").output().unwrap();
    assert!(output.status.success());

    let view = stdout_json(&output);
    assert_eq!(view["products"], Value::Array(vec![]));
    assert_eq!(view["pending_products"], Value::Array(vec![]));
    assert_eq!(view["average_price"], "0");
}

#[test]
fn add_and_duplicate_add() {
    let dir = tempdir().unwrap();
    let (record, admin) = set_up(dir.path());

    let output = cargo_bin(dir.path())
        .args(["add", "P1", "D1", "2.32", "--record", &record, "--caller", &admin])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["average_price"], "2.32");

    cargo_bin(dir.path())
        .args(["add", "P1", "D1", "2.32", "--record", &record, "--caller", &admin])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A product with the same name already exists",
        ));
}

#[test]
fn non_admin_cannot_remove() {
    let dir = tempdir().unwrap();
    let (record, admin) = set_up(dir.path());
    let outsider = "0190f3a4-0000-7000-8000-000000000001";

    cargo_bin(dir.path())
        .args(["add", "P1", "D1", "2.32", "--record", &record, "--caller", &admin])
        .assert()
        .success();

    cargo_bin(dir.path())
        .args(["remove", "P1", "--record", &record, "--caller", outsider])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only the catalog admin"));

    let output = cargo_bin(dir.path())
        .args(["show", "--record", &record])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["products"][0]["name"], "P1");
}

#[test]
fn proposal_workflow() {
    let dir = tempdir().unwrap();
    let (record, admin) = set_up(dir.path());
    let proposer = "0190f3a4-0000-7000-8000-000000000002";

    for name in ["A", "B"] {
        cargo_bin(dir.path())
            .args(["propose", name, "desc", "2.32", "--record", &record, "--caller", proposer])
            .assert()
            .success();
    }

    let output = cargo_bin(dir.path())
        .args(["approve", "0", "--record", &record, "--caller", &admin])
        .output()
        .unwrap();
    let view = stdout_json(&output);
    assert_eq!(view["products"][0]["name"], "A");
    assert_eq!(view["pending_products"][0]["name"], "B");

    let output = cargo_bin(dir.path())
        .args(["reject", "0", "--record", &record, "--caller", &admin])
        .output()
        .unwrap();
    let view = stdout_json(&output);
    assert_eq!(view["pending_products"], Value::Array(vec![]));
    assert_eq!(view["average_price"], "2.32");
}

#[test]
fn operations_require_a_caller() {
    let dir = tempdir().unwrap();
    let (record, _) = set_up(dir.path());

    cargo_bin(dir.path())
        .args(["remove", "P1", "--record", &record])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no caller identity given"));
}

#[test]
fn unknown_record_is_reported() {
    let dir = tempdir().unwrap();
    cargo_bin(dir.path())
        .args(["show", "--record", "0190f3a4-0000-7000-8000-0000000000ff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
