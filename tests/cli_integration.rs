//! CLI integration tests for Switchboard
//!
//! These tests verify the complete workflow from initialization through
//! plugin registration and dispatch, ensuring commands work together
//! correctly and registry state survives across invocations.

use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command instance for the switchboard binary
fn switchboard_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("switchboard"))
}

/// Create a temporary directory and initialize a workspace administered by "admin"
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    switchboard_cmd()
        .arg("init")
        .arg(dir.path())
        .args(["--admin", "admin"])
        .assert()
        .success();
    dir
}

/// Run a switchboard command inside the workspace with the given caller
fn in_workspace(dir: &TempDir, caller: &str, args: &[&str]) -> assert_cmd::Command {
    let mut cmd = switchboard_cmd();
    cmd.current_dir(dir.path()).args(["--caller", caller]).args(args);
    cmd
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    switchboard_cmd()
        .arg("init")
        .arg(dir.path())
        .args(["--admin", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized switchboard workspace"));

    assert!(dir.path().join(".switchboard").is_dir());
    assert!(dir.path().join(".switchboard/config.toml").is_file());
    assert!(dir.path().join(".switchboard/registry.json").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    switchboard_cmd()
        .arg("init")
        .arg(dir.path())
        .args(["--admin", "admin"])
        .assert()
        .success();

    // Second init should also succeed and keep the original admin
    switchboard_cmd()
        .arg("init")
        .arg(dir.path())
        .args(["--admin", "someone-else"])
        .assert()
        .success();

    in_workspace(&dir, "admin", &["add", "double"]).assert().success();
}

#[test]
fn test_commands_outside_workspace_fail() {
    let dir = TempDir::new().unwrap();

    switchboard_cmd()
        .current_dir(dir.path())
        .args(["--caller", "admin", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a switchboard workspace"));
}

// =============================================================================
// Plugin Management Tests
// =============================================================================

#[test]
fn test_admin_can_add_plugins() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["add", "double"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered plugin 'double'"));

    in_workspace(&dir, "admin", &["count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_non_admin_cannot_add_plugins() {
    let dir = setup_workspace();

    in_workspace(&dir, "user", &["add", "double"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));

    in_workspace(&dir, "admin", &["count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_duplicate_plugin_is_rejected() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["add", "double"]).assert().success();
    in_workspace(&dir, "admin", &["add", "double"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn test_unknown_plugin_is_rejected() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["add", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plugin"));
}

#[test]
fn test_admin_can_remove_plugins() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["add", "double"]).assert().success();
    in_workspace(&dir, "admin", &["remove", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed plugin"));

    in_workspace(&dir, "admin", &["count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_remove_with_invalid_index_fails() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["remove", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index out of bounds"));
}

#[test]
fn test_list_shows_registered_plugins() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["add", "double"]).assert().success();
    in_workspace(&dir, "admin", &["add", "vault"]).assert().success();

    in_workspace(&dir, "admin", &["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("double").and(predicate::str::contains("vault")));
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_exec_double_plugin() {
    let dir = setup_workspace();
    in_workspace(&dir, "admin", &["add", "double"]).assert().success();

    in_workspace(&dir, "anyone", &["exec", "0", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));
}

#[test]
fn test_exec_with_invalid_position_fails() {
    let dir = setup_workspace();

    in_workspace(&dir, "anyone", &["exec", "999", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid plugin ID"));
}

#[test]
fn test_vault_plugin_mints_across_invocations() {
    let dir = setup_workspace();
    in_workspace(&dir, "admin", &["add", "vault"]).assert().success();

    // First mint: id 1, carried in both the value and the notification
    let output = in_workspace(&dir, "alice", &["exec", "0", "100", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["value"], serde_json::json!(1));
    assert_eq!(json["notifications"][0]["topic"], "vault.created");
    assert_eq!(json["notifications"][0]["payload"]["vault_id"], serde_json::json!(1));

    // Second mint gets a higher id
    let output = in_workspace(&dir, "alice", &["exec", "0", "200", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["value"], serde_json::json!(2));

    in_workspace(&dir, "anyone", &["vault", "count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_vault_show_reports_owner_and_balance() {
    let dir = setup_workspace();
    in_workspace(&dir, "admin", &["add", "vault"]).assert().success();
    in_workspace(&dir, "alice", &["exec", "0", "100"]).assert().success();

    let output = in_workspace(&dir, "anyone", &["vault", "show", "1", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["owner"], "alice");
    assert_eq!(json["balance"], serde_json::json!(100));
    assert!(json["created_at"].as_str().is_some());
}

#[test]
fn test_vault_show_unknown_id_fails() {
    let dir = setup_workspace();
    in_workspace(&dir, "admin", &["add", "vault"]).assert().success();

    in_workspace(&dir, "anyone", &["vault", "show", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No vault with id 7"));
}

#[test]
fn test_vault_queries_without_vault_plugin_fail() {
    let dir = setup_workspace();

    in_workspace(&dir, "anyone", &["vault", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault plugin is not registered"));
}

// =============================================================================
// Administration Tests
// =============================================================================

#[test]
fn test_transfer_admin_moves_rights() {
    let dir = setup_workspace();

    in_workspace(&dir, "admin", &["transfer-admin", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transferred administration to 'bob'"));

    in_workspace(&dir, "admin", &["add", "double"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));

    in_workspace(&dir, "bob", &["add", "double"]).assert().success();
}

#[test]
fn test_non_admin_cannot_transfer_admin() {
    let dir = setup_workspace();

    in_workspace(&dir, "mallory", &["transfer-admin", "mallory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));
}
