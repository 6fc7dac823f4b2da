//! Integration tests for the `stencil` binary.

mod common;

use predicates::prelude::*;

use common::Workspace;

#[test]
fn help_lists_subcommands() {
    Workspace::new()
        .stencil()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    Workspace::new()
        .stencil()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn new_web_only_project() {
    let ws = Workspace::new();
    ws.new_project("shop", &["--module", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'shop' created with 6 files"))
        .stdout(predicate::str::contains("cd shop"));

    assert_eq!(ws.read("shop/README.md"), "# shop\n");
    assert_eq!(ws.read("shop/apps/web/src/App.tsx"), "export const App = () => 'base';\n");
    assert_eq!(ws.read("shop/apps/web/package.json"), r#"{"name": "@shop/web"}"#);
    assert!(!ws.join("shop/apps/api").exists());
    assert!(!ws.join("shop/apps/web/src/App.with-api.tsx").exists());
}

#[test]
fn new_web_and_api_project() {
    let ws = Workspace::new();
    ws.new_project("shop", &["--all-modules"]).assert().success();

    assert_eq!(
        ws.read("shop/apps/web/src/App.tsx"),
        "export const App = () => fetch('/api');\n"
    );
    assert_eq!(ws.read("shop/apps/api/src/server.ts"), "// shop api\n");
    assert!(ws.read("shop/apps/web/package.json").contains(r#""@shop/api": "workspace:*""#));
}

#[cfg(unix)]
#[test]
fn hook_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let ws = Workspace::new();
    ws.new_project("shop", &["--module", "web"]).assert().success();

    let mode = std::fs::metadata(ws.join("shop/.husky/pre-commit"))
        .unwrap()
        .permissions()
        .mode();
    assert_ne!(mode & 0o111, 0);
}

#[test]
fn dry_run_prints_tree_and_writes_nothing() {
    let ws = Workspace::new();
    ws.new_project("shop", &["--module", "web", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("App.tsx"))
        .stdout(predicate::str::contains("6 files, nothing written"));

    assert!(!ws.join("shop").exists());
}

#[test]
fn quiet_run_prints_nothing() {
    let ws = Workspace::new();
    ws.stencil()
        .args(["-q", "new", "shop", "--templates", "templates", "--module", "web"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(ws.join("shop/package.json").exists());
}

#[test]
fn verbose_run_logs_steps() {
    let ws = Workspace::new();
    ws.stencil()
        .args(["-v", "new", "shop", "--templates", "templates", "--yes", "--module", "web"])
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO"));
}

#[test]
fn force_replaces_existing_project() {
    let ws = Workspace::new();
    ws.write("shop/old.txt", "stale");
    ws.new_project("shop", &["--module", "web", "--force"])
        .assert()
        .success();

    assert!(!ws.join("shop/old.txt").exists());
    assert!(ws.join("shop/package.json").exists());
}

#[test]
fn missing_package_manager_rolls_back() {
    let ws = Workspace::new();
    ws.new_project(
        "shop",
        &[
            "--module",
            "web",
            "--package-manager",
            "stencil-no-such-package-manager",
        ],
    )
    .env("STENCIL__DEFAULTS__INSTALL", "true")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("stencil-no-such-package-manager"));

    assert!(!ws.join("shop").exists());
}

#[test]
fn list_shows_modules_and_roots() {
    Workspace::new()
        .stencil()
        .args(["list", "--templates", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Modules:"))
        .stdout(predicate::str::contains("apps/web"));
}

#[test]
fn list_json_is_parseable() {
    let output = Workspace::new()
        .stencil()
        .args(["list", "--templates", "templates", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["modules"][0]["name"], "web");
}

#[test]
fn config_get_reads_file_and_env() {
    let ws = Workspace::new();
    ws.stencil()
        .args(["config", "get", "defaults.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    ws.stencil()
        .args(["config", "get", "defaults.package_manager"])
        .env("STENCIL__DEFAULTS__PACKAGE_MANAGER", "yarn")
        .assert()
        .success()
        .stdout(predicate::str::contains("yarn"));
}

#[test]
fn init_writes_config_once() {
    let ws = Workspace::new();
    let target = ws.join("fresh/config.toml");
    let init = || {
        let mut cmd = assert_cmd::Command::cargo_bin("stencil").unwrap();
        cmd.env("NO_COLOR", "1").arg("--config").arg(&target).arg("init");
        cmd
    };

    init()
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));
    assert!(ws.read("fresh/config.toml").contains("package_manager"));

    init()
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    init().arg("--force").assert().success();
}

#[test]
fn shell_completions() {
    Workspace::new()
        .stencil()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}
