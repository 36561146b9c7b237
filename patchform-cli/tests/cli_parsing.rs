//! CLI behaviour tests.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn patchform() -> Command {
    Command::cargo_bin("patchform").expect("patchform binary")
}

const REQUEST: &str = r#"{
  "observed": {
    "composite": { "resource": { "spec": { "widgets": "10", "region": "eu" } } }
  }
}"#;

const INPUT: &str = r#"
resources:
  - name: widget
    base:
      kind: Widget
    patches:
      - fromFieldPath: spec.widgets
        toFieldPath: spec.watchers
        transforms:
          - type: convert
            convert:
              toType: int64
          - type: math
            math:
              type: Multiply
              multiply: 3
"#;

fn workspace() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    fs::write(td.path().join("request.json"), REQUEST).unwrap();
    fs::write(td.path().join("input.yaml"), INPUT).unwrap();
    td
}

fn render(dir: &Path) -> Command {
    let mut cmd = patchform();
    cmd.current_dir(dir)
        .arg("render")
        .arg("--request")
        .arg("request.json")
        .arg("--input")
        .arg("input.yaml");
    cmd
}

#[test]
fn render_prints_json_to_stdout() {
    let temp = workspace();
    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"watchers\": 30"))
        .stdout(predicate::str::contains("\"ttlSeconds\": 60"));
}

#[test]
fn render_yaml_format_flag() {
    let temp = workspace();
    render(temp.path())
        .arg("--format")
        .arg("yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains("watchers: 30"));
}

#[test]
fn render_writes_out_file_with_format_from_extension() {
    let temp = workspace();
    render(temp.path())
        .arg("--out")
        .arg("out/response.yaml")
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("out").join("response.yaml")).unwrap();
    assert!(written.contains("watchers: 30"));
    assert!(written.contains("ttlSeconds: 60"));
}

#[test]
fn render_reads_config_file_and_flags_win() {
    let temp = workspace();
    fs::write(
        temp.path().join("patchform.toml"),
        "[engine]\nttl_seconds = 300\n",
    )
    .unwrap();

    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ttlSeconds\": 300"));

    render(temp.path())
        .arg("--ttl-seconds")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ttlSeconds\": 7"));
}

#[test]
fn render_exits_2_on_fatal_result() {
    let temp = workspace();
    fs::write(
        temp.path().join("input.yaml"),
        "resources:\n  - name: a\n    base: {}\n    patches:\n      - type: PatchSet\n        patchSetName: missing\n",
    )
    .unwrap();

    render(temp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("undefined patch set"));
}

#[test]
fn render_evaluates_path_conditions() {
    let temp = workspace();
    fs::write(
        temp.path().join("input.yaml"),
        format!("condition: observed.composite.resource.spec.region == \"us\"\n{INPUT}"),
    )
    .unwrap();

    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("watchers").not());
}

#[test]
fn render_missing_request_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    patchform()
        .current_dir(temp.path())
        .arg("render")
        .arg("--request")
        .arg("nope.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("nope.json"));
}

#[test]
fn render_requires_request_flag() {
    patchform()
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--request"));
}

#[test]
fn render_invalid_toml_config_fails() {
    let temp = workspace();
    fs::write(temp.path().join("patchform.toml"), "[engine\n").unwrap();
    render(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("patchform.toml"));
}

#[test]
fn validate_accepts_good_input() {
    let temp = workspace();
    patchform()
        .current_dir(temp.path())
        .arg("validate")
        .arg("input.yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (1 templates, 1 patches"));
}

#[test]
fn validate_reports_every_location() {
    let temp = workspace();
    fs::write(
        temp.path().join("bad.yaml"),
        r#"
resources:
  - name: a
    patches:
      - type: CombineFromComposite
        toFieldPath: spec.x
        combine:
          variables: []
          strategy: string
          string:
            fmt: "%s"
  - name: a
"#,
    )
    .unwrap();

    patchform()
        .current_dir(temp.path())
        .arg("validate")
        .arg("bad.yaml")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("resources[0].patches[0].combine.variables"))
        .stdout(predicate::str::contains("resources[1].name"));
}

#[test]
fn list_transforms_text_format() {
    patchform()
        .arg("list-transforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("CombineFromEnvironment"));
}

#[test]
fn list_transforms_json_format() {
    patchform()
        .arg("list-transforms")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"patchTypes\""))
        .stdout(predicate::str::contains("\"ClampMin\""));
}

#[test]
fn list_transforms_invalid_format() {
    patchform()
        .arg("list-transforms")
        .arg("--format")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("invalid").or(predicate::str::contains("possible values")),
        );
}

#[test]
fn explain_transform_and_patch_type() {
    patchform()
        .arg("explain")
        .arg("MATCH")
        .assert()
        .success()
        .stdout(predicate::str::contains("fallbackValue"));

    patchform()
        .arg("explain")
        .arg("toEnvironmentFieldPath")
        .assert()
        .success()
        .stdout(predicate::str::contains("-> environment"));
}

#[test]
fn explain_unknown_name() {
    patchform()
        .arg("explain")
        .arg("nonexistent")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unknown"));
}
