use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;

const RECORDS: &str = r#"[
  {"id": 1, "name": "Alice", "year": 2000},
  {"id": 2, "name": "Bob", "parent": "Alice", "year": 2000, "active": true},
  {"id": 3, "name": "Cara", "parent": "Bob", "year": 2003, "pledge_label": "Gamma"}
]"#;

fn write_fixture(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write fixture");
    path
}

fn cli() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo_bin!("lineage-cli"))
}

fn stderr_text(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn cli_layout_prints_nodes_links_and_viewport() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(&tmp, "lineage.json", RECORDS);

    let assert = cli()
        .args(["layout", input.to_string_lossy().as_ref()])
        .assert()
        .success();
    let out = stdout_json(assert.get_output());

    let names: Vec<&str> = out["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .filter_map(|n| n["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Cara"]);

    let links = out["links"].as_array().expect("links");
    assert_eq!(links.len(), 3);
    assert_eq!(links[0]["source"], Value::Null);
    assert_eq!(links[0]["path"], "M0,0L0,76");

    assert_eq!(out["bounds"]["min_x"], json!(-225.0));
    assert_eq!(out["transform"], json!({"x": 0.0, "y": 0.0, "k": 1.0}));
    assert_eq!(out["active_dots"].as_array().map(Vec::len), Some(1));
    assert_eq!(out["minimap"]["height"], json!(150.0));
}

#[test]
fn cli_layout_is_the_default_command_and_reads_stdin() {
    let assert = cli().write_stdin(RECORDS).assert().success();
    let out = stdout_json(assert.get_output());
    assert_eq!(out["nodes"].as_array().map(Vec::len), Some(3));
}

#[test]
fn cli_viewport_flags_resize_the_brush() {
    let default = stdout_json(cli().write_stdin(RECORDS).assert().success().get_output());
    let small = stdout_json(
        cli()
            .args(["--viewport-width", "400", "--viewport-height", "300", "-"])
            .write_stdin(RECORDS)
            .assert()
            .success()
            .get_output(),
    );

    let w = |v: &Value| v["brush"]["width"].as_f64().expect("brush width");
    assert!((w(&default) - 2.0 * w(&small)).abs() < 1e-9);
}

#[test]
fn cli_search_reports_threshold_and_hits() {
    let short = stdout_json(
        cli()
            .args(["search", "bo"])
            .write_stdin(RECORDS)
            .assert()
            .success()
            .get_output(),
    );
    assert_eq!(short, json!({"state": "below_threshold"}));

    let hits = stdout_json(
        cli()
            .args(["search", "CAR", "-"])
            .write_stdin(RECORDS)
            .assert()
            .success()
            .get_output(),
    );
    assert_eq!(hits["state"], "results");
    assert_eq!(hits["hits"][0]["label"], "Cara '03");
}

#[test]
fn cli_config_overrides_are_merged_over_defaults() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = write_fixture(&tmp, "config.json", r#"{"search": {"min_query_len": 1}}"#);

    let out = stdout_json(
        cli()
            .args(["search", "c", "--config", config.to_string_lossy().as_ref()])
            .write_stdin(RECORDS)
            .assert()
            .success()
            .get_output(),
    );
    assert_eq!(out["state"], "results");
    assert_eq!(out["hits"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_select_prints_lineage_by_name() {
    let out = stdout_json(
        cli()
            .args(["select", "Bob", "--pretty"])
            .write_stdin(RECORDS)
            .assert()
            .success()
            .get_output(),
    );
    assert_eq!(out["name"], "Bob");
    assert_eq!(out["big"], "Alice");
    assert_eq!(out["littles"], json!(["Cara"]));
    assert_eq!(out["ancestors"], json!(["Alice"]));
    assert_eq!(out["descendants"], json!(["Cara"]));
    assert_eq!(out["summary"]["descendant_count"], 1);
    assert_eq!(out["summary"]["active_total"], 1);
}

#[test]
fn cli_select_unknown_name_fails() {
    let assert = cli()
        .args(["select", "Zed"])
        .write_stdin(RECORDS)
        .assert()
        .failure()
        .code(1);
    assert!(stderr_text(assert.get_output()).contains("No record named"));
}

#[test]
fn cli_rejects_cyclic_input() {
    let cyclic = r#"[
      {"id": 1, "name": "A", "parent": "B", "year": 2000},
      {"id": 2, "name": "B", "parent": "A", "year": 2001}
    ]"#;
    let assert = cli().write_stdin(cyclic).assert().failure().code(1);
    assert!(stderr_text(assert.get_output()).contains("cyclic parentage"));
}

#[test]
fn cli_usage_errors_exit_with_2() {
    cli().arg("--bogus").assert().failure().code(2);
    cli().arg("search").assert().failure().code(2);
    cli()
        .args(["--viewport-width", "wide"])
        .assert()
        .failure()
        .code(2);
}

