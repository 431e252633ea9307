// CLI integration tests for dump inspection flows.
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_rowset");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn json_lines(output: &[u8]) -> Vec<Value> {
    let text = std::str::from_utf8(output).expect("utf8");
    text.lines().map(parse_json).collect()
}

const DUMP: &str = r#"{
  "columns": [
    {"name": "id", "type": "BIGINT"},
    {"name": "user_name", "type": "VARCHAR"},
    {"name": "score", "type": "DOUBLE"},
    {"name": "created_at", "type": "DATETIME"},
    {"name": "shift", "type": "TIME"},
    {"name": "payload", "type": "BLOB"}
  ],
  "rows": [
    ["1", "Alice", "2.5", {"timestamp": "2024-01-02 03:04:05"}, "08:00:00", "raw"],
    [2, null, 7.25, "0000-00-00 00:00:00", null, null]
  ]
}"#;

fn write_dump(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write dump");
    path
}

#[test]
fn columns_report_categories() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(temp.path(), "users.json", DUMP);

    let out = cmd()
        .args(["columns", path.to_str().unwrap()])
        .output()
        .expect("columns");
    assert!(out.status.success());
    let columns = json_lines(&out.stdout);
    assert_eq!(columns.len(), 6);
    assert_eq!(columns[0]["name"], "id");
    assert_eq!(columns[0]["category"], "int");
    assert_eq!(columns[2]["category"], "float");
    assert_eq!(columns[4]["category"], "string");
    assert!(columns[5]["category"].is_null());
}

#[test]
fn rows_emit_one_object_per_row() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(temp.path(), "users.json", DUMP);

    let out = cmd()
        .args(["rows", path.to_str().unwrap()])
        .output()
        .expect("rows");
    assert!(out.status.success());
    let rows = json_lines(&out.stdout);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["user_name"], "Alice");
    assert_eq!(rows[0]["created_at"], "2024-01-02 03:04:05");
    assert_eq!(rows[0]["payload"], "raw");
    assert_eq!(rows[1]["user_name"], "");
    assert_eq!(rows[1]["score"], 7.25);
    assert_eq!(rows[1]["created_at"], "0001-01-01 00:00:00");
    assert!(rows[1]["payload"].is_null());
}

#[test]
fn get_reads_through_requested_accessor() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(temp.path(), "users.json", DUMP);

    let out = cmd()
        .args([
            "get",
            path.to_str().unwrap(),
            "--row",
            "0",
            "--column",
            "shift",
            "--as",
            "time",
        ])
        .output()
        .expect("get");
    assert!(out.status.success());
    let value = parse_json(std::str::from_utf8(&out.stdout).expect("utf8").trim());
    assert_eq!(value["row"], 0);
    assert_eq!(value["column"], "shift");
    assert_eq!(value["value"], "0001-01-01 08:00:00");
}

#[test]
fn unsupported_conversion_exits_with_json_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(temp.path(), "users.json", DUMP);

    let out = cmd()
        .args([
            "get",
            path.to_str().unwrap(),
            "--row",
            "0",
            "--column",
            "score",
            "--as",
            "string",
        ])
        .output()
        .expect("get");
    assert_eq!(out.status.code(), Some(5));
    let err = parse_json(std::str::from_utf8(&out.stderr).expect("utf8").trim());
    assert_eq!(err["error"]["kind"], "UnsupportedConversion");
    assert_eq!(err["error"]["column"], "score");
    let message = err["error"]["message"].as_str().expect("message");
    assert!(message.contains("DOUBLE"));
}

#[test]
fn strict_temporal_flag_rejects_zero_dates() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(temp.path(), "users.json", DUMP);

    let out = cmd()
        .args([
            "--strict-temporal",
            "get",
            path.to_str().unwrap(),
            "--row",
            "1",
            "--column",
            "created_at",
        ])
        .output()
        .expect("get");
    assert_eq!(out.status.code(), Some(6));
    let err = parse_json(std::str::from_utf8(&out.stderr).expect("utf8").trim());
    assert_eq!(err["error"]["kind"], "Parse");
}

#[test]
fn out_of_range_row_is_a_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(temp.path(), "users.json", DUMP);

    let out = cmd()
        .args(["rows", path.to_str().unwrap(), "--row", "9"])
        .output()
        .expect("rows");
    assert_eq!(out.status.code(), Some(2));
    let err = parse_json(std::str::from_utf8(&out.stderr).expect("utf8").trim());
    assert_eq!(err["error"]["kind"], "Usage");
    assert!(err["error"]["hint"].as_str().is_some());
}

#[test]
fn duplicate_columns_can_be_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_dump(
        temp.path(),
        "dup.json",
        r#"{"columns":[{"name":"a","type":"INT"},{"name":"a","type":"INT"}],"rows":[[1,2]]}"#,
    );

    let shadowed = cmd()
        .args(["rows", path.to_str().unwrap()])
        .output()
        .expect("rows");
    assert!(shadowed.status.success());
    let rows = json_lines(&shadowed.stdout);
    assert_eq!(rows[0]["a"], 2);

    let rejected = cmd()
        .args(["--reject-duplicates", "rows", path.to_str().unwrap()])
        .output()
        .expect("rows");
    assert_eq!(rejected.status.code(), Some(10));
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("nope.json");

    let out = cmd()
        .args(["columns", missing.to_str().unwrap()])
        .output()
        .expect("columns");
    assert_eq!(out.status.code(), Some(3));
    let err = parse_json(std::str::from_utf8(&out.stderr).expect("utf8").trim());
    assert_eq!(err["error"]["kind"], "Io");
    assert!(err["error"]["causes"].as_array().is_some());
}
