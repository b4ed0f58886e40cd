//! End-to-end tests for the `shelf` binary against a stub product service.

mod common;

use common::{scenario_products, start_stub, FilterMode, Stub};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn shelf_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("shelf");
    path
}

fn setup_test_env(stub: &Stub) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[gateway]
base_url = "{}"
timeout_secs = 5

[state]
path = "{}/data/state.json"
"#,
        stub.base_url,
        root.display()
    );

    let config_path = config_dir.join("shelf.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_shelf(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = shelf_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run shelf binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn json_prices(stdout: &str) -> Vec<u64> {
    let view: Value = serde_json::from_str(stdout).unwrap();
    view["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_u64().unwrap())
        .collect()
}

#[test]
fn test_list_prints_catalog() {
    let stub = start_stub(scenario_products(), FilterMode::Filter);
    let (_tmp, config_path) = setup_test_env(&stub);

    let (stdout, stderr, success) = run_shelf(&config_path, &["list"]);
    assert!(success, "list failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("all products (5 shown)"));
    assert!(stdout.contains("Air Max 90"));
    assert!(stdout.contains("179,000원"));
}

#[test]
fn test_list_sort_and_search() {
    let stub = start_stub(scenario_products(), FilterMode::Filter);
    let (_tmp, config_path) = setup_test_env(&stub);

    let (stdout, stderr, success) = run_shelf(
        &config_path,
        &["list", "--sort", "price", "--order", "desc", "--search", "AIR", "--json"],
    );
    assert!(success, "list failed: stderr={}", stderr);
    assert_eq!(json_prices(&stdout), vec![179000, 130000]);
}

#[test]
fn test_filter_price_bucket() {
    let stub = start_stub(scenario_products(), FilterMode::Filter);
    let (_tmp, config_path) = setup_test_env(&stub);

    let (stdout, stderr, success) =
        run_shelf(&config_path, &["filter", "--price", "10만원 - 20만원", "--json"]);
    assert!(success, "filter failed: stderr={}", stderr);
    assert_eq!(json_prices(&stdout), vec![130000, 179000]);
    assert_eq!(
        stub.filter_bodies(),
        vec![serde_json::json!({ "price": ["10만원 - 20만원"] })]
    );
}

#[test]
fn test_filter_failure_falls_back_with_notice() {
    let stub = start_stub(
        scenario_products(),
        FilterMode::Status(500, "filter backend down".to_string()),
    );
    let (_tmp, config_path) = setup_test_env(&stub);

    let (stdout, stderr, success) =
        run_shelf(&config_path, &["filter", "--brand", "나이키", "--json"]);
    assert!(success, "filter should not fail the command: stderr={}", stderr);
    assert!(stderr.contains("showing the full catalog"));
    assert_eq!(json_prices(&stdout).len(), 5);
}

#[test]
fn test_filter_saves_state_and_reset_clears_it() {
    let stub = start_stub(scenario_products(), FilterMode::Filter);
    let (_tmp, config_path) = setup_test_env(&stub);

    let (_, stderr, success) = run_shelf(
        &config_path,
        &["filter", "--brand", "나이키", "--sort", "likeCount", "--order", "desc"],
    );
    assert!(success, "filter failed: stderr={}", stderr);

    let (stdout, _, success) = run_shelf(&config_path, &["state"]);
    assert!(success);
    let state: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(state["applied"]["brand"], serde_json::json!(["나이키"]));
    assert_eq!(state["sort"]["field"], "likeCount");

    let (stdout, _, success) = run_shelf(&config_path, &["list", "--saved", "--json"]);
    assert!(success);
    assert_eq!(json_prices(&stdout), vec![130000, 179000]);

    let (_, _, success) = run_shelf(&config_path, &["reset"]);
    assert!(success);
    let (stdout, _, _) = run_shelf(&config_path, &["state"]);
    let state: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(state["applied"]["brand"], serde_json::json!([]));
    assert_eq!(state["sort"]["field"], "none");
}

#[test]
fn test_facets_needs_no_config() {
    let binary = shelf_binary();
    let output = Command::new(&binary)
        .args(["--config", "/nonexistent/shelf.toml", "facets"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LIGHT_GRAY"));
    assert!(stdout.contains("Others"));
}

#[test]
fn test_missing_config_fails() {
    let binary = shelf_binary();
    let output = Command::new(&binary)
        .args(["--config", "/nonexistent/shelf.toml", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
