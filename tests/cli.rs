use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;

fn annoexport() -> Command {
    let mut cmd = Command::cargo_bin("annoexport").unwrap();
    cmd.env_remove("ANNOEXPORT_DATA")
        .env_remove("ANNOEXPORT_SCRATCH_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn runs() {
    annoexport()
        .assert()
        .success()
        .stdout(predicate::str::contains("annoexport"));
}

#[test]
fn outputs_tool_name() {
    annoexport()
        .arg("-V")
        .assert()
        .success()
        .stdout("annoexport 0.1.0\n");
}

// Projects subcommand tests

#[test]
fn projects_lists_counts() {
    annoexport()
        .args(["projects", "--data", common::SAMPLE_STORE])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tpets\t4 images, 4 annotations"))
        .stdout(predicate::str::contains("2\tempty\t0 images, 0 annotations"));
}

#[test]
fn projects_reads_data_from_env() {
    annoexport()
        .env("ANNOEXPORT_DATA", common::SAMPLE_STORE)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("pets"));
}

#[test]
fn projects_missing_store_fails() {
    annoexport()
        .args(["projects", "--data", "tests/fixtures/does_not_exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

// Export subcommand tests

#[test]
fn export_coco_to_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("pets.json");

    annoexport()
        .args(["export", "--data", common::SAMPLE_STORE, "--project", "1"])
        .args(["--format", "coco", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported coco:"))
        .stdout(predicate::str::contains("annotation 12 on image 2: not a bounding box"));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["annotations"].as_array().unwrap().len(), 4);
}

#[test]
fn export_into_directory_uses_download_name() {
    let temp = tempfile::tempdir().expect("create temp dir");

    annoexport()
        .args(["export", "--data", common::SAMPLE_STORE, "--project", "1"])
        .args(["--format", "yolo", "--output"])
        .arg(temp.path())
        .assert()
        .success();

    let archive = temp.path().join("pets_yolo.zip");
    let entries = common::zip_entries(&archive);
    assert_eq!(entries["classes.txt"], "bird\ncat\ndog\n");
}

#[test]
fn export_voc_with_json_report() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("pets_voc.zip");

    let assert = annoexport()
        .args(["export", "--data", common::SAMPLE_STORE, "--project", "1"])
        .args(["--format", "pascal-voc", "--report", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("json report");
    assert_eq!(report["format"], "pascal-voc");
    assert_eq!(report["boxes_written"], 3);
    assert_eq!(report["skipped"][0]["reason"], "unsupported_kind");
    assert!(output.is_file());
}

#[test]
fn export_uses_scratch_dir_and_cleans_up() {
    let scratch = tempfile::tempdir().expect("create temp dir");
    let out = tempfile::tempdir().expect("create temp dir");

    annoexport()
        .env("ANNOEXPORT_SCRATCH_DIR", scratch.path())
        .args(["export", "--data", common::SAMPLE_STORE, "--project", "1"])
        .args(["--format", "voc", "--output"])
        .arg(out.path().join("voc.zip"))
        .assert()
        .success();

    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn export_unknown_project_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");

    annoexport()
        .args(["export", "--data", common::SAMPLE_STORE, "--project", "99"])
        .args(["--output"])
        .arg(temp.path().join("x.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project not found: 99"));
}

#[test]
fn export_unsupported_format_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");

    annoexport()
        .args(["export", "--data", common::SAMPLE_STORE, "--project", "1"])
        .args(["--format", "tfrecord", "--output"])
        .arg(temp.path().join("x"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

#[test]
fn verbose_export_logs_to_stderr() {
    let temp = tempfile::tempdir().expect("create temp dir");

    annoexport()
        .args(["-v", "export", "--data", common::SAMPLE_STORE, "--project", "1"])
        .args(["--format", "coco", "--output"])
        .arg(temp.path().join("pets.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO"));
}
