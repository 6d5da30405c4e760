//! E2E tests for `pedigree chart`: ordering, config, output modes, errors.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAMILY: &str = r##"{
  "persons": [
    { "id": "I1", "gender": { "type": "http://gedcomx.org/Male" },
      "names": [{ "nameForms": [{ "fullText": "John Carter" }] }] },
    { "id": "I2", "gender": { "type": "http://gedcomx.org/Female" } },
    { "id": "I3", "gender": { "type": "http://gedcomx.org/Male" } },
    { "id": "I4", "gender": { "type": "http://gedcomx.org/Female" } },
    { "id": "I5", "gender": { "type": "http://gedcomx.org/Female" } },
    { "id": "I6", "gender": { "type": "http://gedcomx.org/Male" } },
    { "id": "I7" }
  ],
  "relationships": [
    { "id": "R1", "type": "http://gedcomx.org/Couple",
      "person1": { "resource": "#I1" }, "person2": { "resource": "#I2" } },
    { "id": "R2", "type": "http://gedcomx.org/ParentChild",
      "person1": { "resource": "#I1" }, "person2": { "resource": "#I3" } },
    { "id": "R3", "type": "http://gedcomx.org/ParentChild",
      "person1": { "resource": "#I2" }, "person2": { "resource": "#I3" } },
    { "id": "R4", "type": "http://gedcomx.org/ParentChild",
      "person1": { "resource": "#I1" }, "person2": { "resource": "#I4" } },
    { "id": "R5", "type": "http://gedcomx.org/ParentChild",
      "person1": { "resource": "#I2" }, "person2": { "resource": "#I4" } },
    { "id": "R6", "type": "http://gedcomx.org/Couple",
      "person1": { "resource": "#I3" }, "person2": { "resource": "#I5" } },
    { "id": "R7", "type": "http://gedcomx.org/ParentChild",
      "person1": { "resource": "#I3" }, "person2": { "resource": "#I6" } },
    { "id": "R8", "type": "http://gedcomx.org/ParentChild",
      "person1": { "resource": "#I5" }, "person2": { "resource": "#I6" } }
  ]
}"##;

fn pedigree_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pedigree"));
    cmd.current_dir(dir);
    cmd.env("PEDIGREE_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env_remove("FORMAT");
    cmd
}

fn write_doc(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("family.json");
    fs::write(&path, content).expect("write document");
    path
}

fn chart_json(dir: &Path, extra: &[&str]) -> Value {
    let output = pedigree_cmd(dir)
        .args(["chart", "family.json", "--json"])
        .args(extra)
        .output()
        .expect("chart should not crash");
    assert!(
        output.status.success(),
        "chart failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("chart --json must parse")
}

fn order(chart: &Value) -> Vec<String> {
    chart["boxes"]
        .as_array()
        .expect("boxes array")
        .iter()
        .map(|b| b["person"].as_str().expect("person").to_string())
        .collect()
}

#[test]
fn chart_json_lists_boxes_in_chart_order() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);

    let chart = chart_json(dir.path(), &[]);
    assert_eq!(order(&chart), vec!["I1", "I3", "I6", "I5", "I4", "I2", "I7"]);
    assert_eq!(chart["subtrees"], 2);
    assert_eq!(chart["generations"], 3);
    assert_eq!(chart["boxes"][0]["name"], "John Carter");
    assert_eq!(chart["boxes"][0]["generation"], 2);

    let families = chart["families"].as_array().expect("families");
    assert_eq!(families.len(), 2);
    assert_eq!(families[0]["family"], "I1&I2");
    assert_eq!(families[0]["children"], serde_json::json!(["I3", "I4"]));
}

#[test]
fn principal_flag_reseeds_layout() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);

    let chart = chart_json(dir.path(), &["--principal", "I6"]);
    assert_eq!(order(&chart), vec!["I1", "I3", "I4", "I2", "I6", "I5", "I7"]);
}

#[test]
fn project_config_hides_persons() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);
    fs::write(
        dir.path().join("pedigree.toml"),
        "[chart]\nhidden = [\"I5\"]\n",
    )
    .expect("write config");

    let chart = chart_json(dir.path(), &[]);
    let persons = order(&chart);
    assert!(!persons.contains(&"I5".to_string()));
    assert_eq!(persons.len(), 6);
}

#[test]
fn hide_flag_adds_to_config() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);
    fs::write(
        dir.path().join("pedigree.toml"),
        "[chart]\nhidden = [\"I5\"]\n",
    )
    .expect("write config");

    let chart = chart_json(dir.path(), &["--hide", "I7"]);
    let persons = order(&chart);
    assert!(!persons.contains(&"I5".to_string()));
    assert!(!persons.contains(&"I7".to_string()));
    assert_eq!(chart["subtrees"], 1);
}

#[test]
fn format_env_selects_text_rows() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);

    pedigree_cmd(dir.path())
        .env("FORMAT", "text")
        .args(["chart", "family.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "position\tsubtree\tgeneration\tperson\tname\tduplicate\n",
        ))
        .stdout(predicate::str::contains("0\t0\t2\tI1\tJohn Carter\tfalse"));
}

#[test]
fn pretty_output_groups_subtrees() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);

    pedigree_cmd(dir.path())
        .args(["--format", "pretty", "chart", "family.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subtree 0"))
        .stdout(predicate::str::contains("Subtree 1"))
        .stdout(predicate::str::contains("John Carter [I1]"));
}

#[test]
fn dangling_reference_reports_code() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), &FAMILY.replace("\"#I6\" } },\n    { \"id\": \"R8\"", "\"#I99\" } },\n    { \"id\": \"R8\""));

    pedigree_cmd(dir.path())
        .args(["--format", "text", "chart", "family.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"))
        .stderr(predicate::str::contains("I99"));
}

#[test]
fn json_errors_are_structured() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "{ \"persons\": [ ");

    let output = pedigree_cmd(dir.path())
        .args(["chart", "family.json", "--json"])
        .output()
        .expect("chart should not crash");
    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(err["error"]["error_code"], "E1002");
    assert!(
        err["error"]["message"]
            .as_str()
            .expect("message")
            .contains("family.json")
    );
}

#[test]
fn malformed_project_config_is_config_error() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), FAMILY);
    fs::write(dir.path().join("pedigree.toml"), "[chart\nprincipal = ").expect("write config");

    pedigree_cmd(dir.path())
        .args(["--format", "text", "chart", "family.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"))
        .stderr(predicate::str::contains("pedigree.toml"));
}

#[test]
fn missing_document_fails_with_path() {
    let dir = TempDir::new().expect("tempdir");

    pedigree_cmd(dir.path())
        .args(["--format", "text", "chart", "nowhere.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read nowhere.json"));
}
