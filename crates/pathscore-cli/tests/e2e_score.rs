//! E2E CLI tests for `pathscore score`, `pathscore components` and
//! `pathscore size`.
//!
//! Each test writes a graph document into an isolated temp directory and runs
//! the `pathscore` binary as a subprocess. Tests cover JSON output for exact
//! values and text output for shape.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the `pathscore` binary, rooted in `dir`.
fn pathscore_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pathscore").expect("pathscore binary must exist");
    cmd.current_dir(dir);
    // Suppress tracing output that goes to stderr.
    cmd.env("PATHSCORE_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write test file");
    path
}

/// A - B - C - D, undirected.
const PATH4: &str = r#"{
  "vertices": [{"id": "A"}, {"id": "B"}, {"id": "C"}, {"id": "D"}],
  "edges": [
    {"source": "A", "target": "B", "directed": false},
    {"source": "B", "target": "C", "directed": false},
    {"source": "C", "target": "D", "directed": false}
  ]
}"#;

/// A -> B -> C, plus an unrelated X - Y pair.
const CHAIN_AND_PAIR: &str = r#"{
  "vertices": [{"id": "A", "selected": true}, {"id": "B"}, {"id": "C", "selected": true}],
  "edges": [
    {"source": "A", "target": "B"},
    {"source": "B", "target": "C"},
    {"source": "X", "target": "Y", "directed": false}
  ]
}"#;

fn score_json(dir: &Path, graph: &Path, extra: &[&str]) -> Value {
    let output = pathscore_cmd(dir)
        .arg("score")
        .arg(graph)
        .args(extra)
        .args(["--format", "json"])
        .output()
        .expect("score should not crash");
    assert!(
        output.status.success(),
        "score failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("score --format json should produce valid JSON")
}

fn scores(report: &Value) -> Vec<f64> {
    report["vertices"]
        .as_array()
        .expect("vertices array")
        .iter()
        .map(|v| v["score"].as_f64().expect("numeric score"))
        .collect()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

#[test]
fn score_betweenness_on_path() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "path.json", PATH4);
    let report = score_json(dir.path(), &graph, &["--metric", "betweenness"]);
    assert_eq!(report["metric"], "betweenness");
    assert_eq!(report["rounds"], 4);
    assert_close(&scores(&report), &[0.0, 2.0, 2.0, 0.0]);
    assert_eq!(report["vertices"][1]["id"], "B");
    assert_eq!(report["vertices"][1]["reachable"], 4);
}

#[test]
fn score_average_distance_reports_mean() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "path.json", PATH4);
    let report = score_json(dir.path(), &graph, &["-m", "average_distance"]);
    let mean = report["mean_distance"].as_f64().expect("mean distance");
    assert!((mean - 20.0 / 12.0).abs() < 1e-9);
}

#[test]
fn score_follows_direction_flag() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "chain.json", CHAIN_AND_PAIR);
    let report = score_json(
        dir.path(),
        &graph,
        &["--metric", "farness", "--direction", "outgoing"],
    );
    // A, B, C, X, Y in insertion order.
    assert_close(&scores(&report), &[3.0, 1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn score_reads_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "chain.json", CHAIN_AND_PAIR);
    let config = write_file(
        dir.path(),
        "scoring.toml",
        "[direction]\ninclude_incoming = false\n",
    );
    let report = score_json(
        dir.path(),
        &graph,
        &["--metric", "farness", "--config", config.to_str().expect("utf8 path")],
    );
    assert_close(&scores(&report), &[3.0, 1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn score_normalises_per_component() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "path.json", PATH4);
    let report = score_json(
        dir.path(),
        &graph,
        &["--metric", "betweenness", "--normalize", "by-possible", "--per-component"],
    );
    // One component of 4: (3 * 2) / 2 = 3.
    assert_close(&scores(&report), &[0.0, 2.0 / 3.0, 2.0 / 3.0, 0.0]);
    assert_eq!(report["normalization"], "by_possible");
    assert_eq!(report["per_component"], true);
}

#[test]
fn score_selected_only_without_selection_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "path.json", PATH4);
    pathscore_cmd(dir.path())
        .arg("score")
        .arg(&graph)
        .args(["--metric", "closeness", "--selected-only", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn score_text_output_has_header_and_rows() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "path.json", PATH4);
    pathscore_cmd(dir.path())
        .arg("score")
        .arg(&graph)
        .args(["--metric", "eccentricity", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id  score  reachable\n"))
        .stdout(predicate::str::contains("A  3  4"));
}

#[test]
fn score_rejects_unknown_metric() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "path.json", PATH4);
    pathscore_cmd(dir.path())
        .arg("score")
        .arg(&graph)
        .args(["--metric", "pagerank"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown score type"));
}

#[test]
fn score_missing_graph_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    pathscore_cmd(dir.path())
        .args(["score", "absent.json", "--metric", "farness"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read graph file"));
}

// ---------------------------------------------------------------------------
// components / size
// ---------------------------------------------------------------------------

#[test]
fn components_lists_each_component() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "chain.json", CHAIN_AND_PAIR);
    let output = pathscore_cmd(dir.path())
        .arg("components")
        .arg(&graph)
        .arg("--json")
        .output()
        .expect("components should not crash");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["count"], 2);
    assert_eq!(report["components"][0]["members"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(report["components"][1]["size"], 2);
}

#[test]
fn size_counts_selected_members() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "chain.json", CHAIN_AND_PAIR);
    pathscore_cmd(dir.path())
        .arg("size")
        .arg(&graph)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout("5\n");
    pathscore_cmd(dir.path())
        .arg("size")
        .arg(&graph)
        .args(["--selected-only", "--members", "A,B", "--format", "text"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn size_rejects_unknown_member() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "chain.json", CHAIN_AND_PAIR);
    pathscore_cmd(dir.path())
        .arg("size")
        .arg(&graph)
        .args(["--members", "Q", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown_vertex"));
}
