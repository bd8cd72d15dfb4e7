//! End-to-end tests for the `waypoint` binary

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn demo(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(file)
}

/// A `waypoint` command isolated from the user's config and environment
fn waypoint(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.env_remove("WAYPOINT_GRAPH")
        .env_remove("WAYPOINT_CATALOG")
        .env_remove("RUST_LOG")
        .env("WAYPOINT_CONFIG", config_dir.path().join("config.toml"));
    cmd
}

fn matrix(config_dir: &TempDir) -> Command {
    let mut cmd = waypoint(config_dir);
    cmd.arg("--graph")
        .arg(demo("matrix.json"))
        .arg("--catalog")
        .arg(demo("matrix.toml"));
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_run_friends_table() {
    let dir = TempDir::new().unwrap();
    matrix(&dir)
        .args(["run", "friends", "--start", "Thomas Anderson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Traversal 'friends' from 1 (Thomas Anderson)"))
        .stdout(predicate::str::contains("Trinity"))
        .stdout(predicate::str::contains("Agent Smith"))
        .stdout(predicate::str::contains("The Architect").not());
}

#[test]
fn test_run_friends_json() {
    let dir = TempDir::new().unwrap();
    let report = json_output(matrix(&dir).args(["--format", "json", "run", "friends", "--start", "1"]));

    let nodes = report["nodes"].as_array().unwrap();
    let names: Vec<&str> = nodes
        .iter()
        .map(|n| n["node"]["properties"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Trinity", "Morpheus", "Cypher", "Agent Smith"]);
    assert_eq!(nodes[3]["depth"], 3);
    assert_eq!(nodes[3]["via"], "knows");
    assert_eq!(report["start"], 1);
    assert_eq!(report["stats"]["nodes_returned"], 4);
}

#[test]
fn test_run_hackers() {
    let dir = TempDir::new().unwrap();
    let report = json_output(matrix(&dir).args(["-f", "json", "run", "hackers", "-s", "Thomas Anderson"]));

    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["node"]["properties"]["name"], "The Architect");
    assert_eq!(nodes[0]["depth"], 4);
    assert_eq!(nodes[0]["previous"], 5);
}

#[test]
fn test_run_with_limit() {
    let dir = TempDir::new().unwrap();
    let report = json_output(matrix(&dir).args([
        "--format", "json", "run", "friends", "--start", "1", "--limit", "2",
    ]));
    assert_eq!(report["nodes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_run_expand_none() {
    let dir = TempDir::new().unwrap();
    let report = json_output(matrix(&dir).args(["--format", "json", "run", "self", "--start", "Trinity"]));
    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["node"]["id"], 2);
}

#[test]
fn test_run_unknown_traversal() {
    let dir = TempDir::new().unwrap();
    matrix(&dir)
        .args(["run", "enemies", "--start", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown traversal descriptor: enemies"));
}

#[test]
fn test_run_unknown_start() {
    let dir = TempDir::new().unwrap();
    matrix(&dir)
        .args(["run", "friends", "--start", "Neo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No node with name = 'Neo'"));
}

#[test]
fn test_traverse_inline_depth() {
    let dir = TempDir::new().unwrap();
    let report = json_output(matrix(&dir).args([
        "--format",
        "json",
        "traverse",
        "--start",
        "1",
        "--type",
        "knows:outgoing",
        "--depth",
        "1",
        "--all-but-start",
    ]));

    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n["depth"] == 1));
    assert_eq!(report["traversal"], "inline");
}

#[test]
fn test_traverse_depth_first_incoming() {
    let dir = TempDir::new().unwrap();
    let report = json_output(matrix(&dir).args([
        "--format",
        "json",
        "traverse",
        "--start",
        "The Architect",
        "--type",
        "coded_by:incoming",
        "--type",
        "knows:in",
        "--order",
        "dfs",
    ]));

    let names: Vec<&str> = report["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["node"]["properties"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["The Architect", "Agent Smith", "Cypher", "Morpheus", "Thomas Anderson"]
    );
}

#[test]
fn test_traverse_invalid_direction() {
    let dir = TempDir::new().unwrap();
    matrix(&dir)
        .args(["traverse", "--start", "1", "--type", "knows:sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid direction: sideways"));
}

#[test]
fn test_traverse_zero_depth_rejected() {
    let dir = TempDir::new().unwrap();
    matrix(&dir)
        .args(["traverse", "--start", "1", "--type", "knows", "--depth", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_missing_graph() {
    let dir = TempDir::new().unwrap();
    waypoint(&dir)
        .args(["graph", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No graph file given"));
}

#[test]
fn test_graph_stats() {
    let dir = TempDir::new().unwrap();
    let stats = json_output(matrix(&dir).args(["--format", "json", "graph", "stats"]));
    assert_eq!(stats["nodes"], 6);
    assert_eq!(stats["relationships"], 7);
    assert_eq!(stats["types"]["knows"], 5);

    matrix(&dir)
        .args(["graph", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Relationships: 7"))
        .stdout(predicate::str::contains("coded_by: 1"));
}

#[test]
fn test_catalog_list_and_show() {
    let dir = TempDir::new().unwrap();
    matrix(&dir)
        .args(["catalog", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Traversals (4):"))
        .stdout(predicate::str::contains("hackers (depth_first; knows:outgoing, coded_by:outgoing)"));

    matrix(&dir)
        .args(["catalog", "show", "acquaintances"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stop: depth 1"))
        .stdout(predicate::str::contains("Returnable: all but start node"));

    let spec = json_output(matrix(&dir).args(["--format", "json", "catalog", "show", "hackers"]));
    assert_eq!(spec["order"], "depth_first");
    assert_eq!(spec["returnable"]["last_relationship_type"], "coded_by");
}

#[test]
fn test_config_defaults_apply() {
    let dir = TempDir::new().unwrap();
    waypoint(&dir)
        .args(["config", "set", "graph"])
        .arg(demo("matrix.json"))
        .assert()
        .success();
    waypoint(&dir)
        .args(["config", "set", "catalog"])
        .arg(demo("matrix.toml"))
        .assert()
        .success();
    waypoint(&dir)
        .args(["config", "set", "format", "json"])
        .assert()
        .success();

    let report = json_output(waypoint(&dir).args(["run", "hackers", "--start", "1"]));
    assert_eq!(report["nodes"].as_array().unwrap().len(), 1);

    waypoint(&dir)
        .args(["--format", "table", "graph", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 6"));
}

#[test]
fn test_config_init_and_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    waypoint(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    waypoint(&dir).args(["config", "init"]).assert().success();
    assert!(path.exists());

    waypoint(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    waypoint(&dir).args(["config", "init", "--force"]).assert().success();

    waypoint(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("format = table"))
        .stdout(predicate::str::contains("graph = (not set)"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    waypoint(&dir)
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: colour"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    waypoint(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("waypoint"));
}
