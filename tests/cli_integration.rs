// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the depscope CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Run depscope isolated from the user's configuration
fn depscope(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("depscope").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DEPSCOPE_CONFIG")
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .arg("--no-color");
    cmd
}

fn cyclic_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "composer.json",
        r#"{
            "name": "demo/app",
            "require": { "php": "^8.2", "demo/a": "^1.0" },
            "autoload": { "psr-4": { "Demo\\App\\": "src/" } }
        }"#,
    );
    write(
        dir.path(),
        "composer.lock",
        r#"{
            "packages": [
                { "name": "demo/a", "version": "1.0.0", "require": { "demo/b": "^1.0" } },
                { "name": "demo/b", "version": "1.0.0", "require": { "demo/a": "^1.0" } }
            ]
        }"#,
    );
    write(
        dir.path(),
        "src/Kernel.php",
        "<?php\nnamespace Demo\\App;\n\nuse Demo\\App\\Http\\Request;\n\nclass Kernel {}\n",
    );
    write(
        dir.path(),
        "src/Http/Request.php",
        "<?php\nnamespace Demo\\App\\Web;\n\nclass Request {}\n",
    );
    dir
}

#[test]
fn test_deps_lists_direct_and_locked() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();

    depscope(&home)
        .arg("deps")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("demo/a"))
        .stdout(predicate::str::contains("demo/b"))
        .stdout(predicate::str::contains("php").not());
}

#[test]
fn test_deps_json_output() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();

    let output = depscope(&home)
        .args(["--json", "deps"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["productionCount"], 1);
    assert_eq!(report["stats"]["lockedProduction"], 2);
    assert_eq!(report["nodes"][0]["usedBy"][0], "demo/b");
    assert_eq!(report["fingerprint"].as_str().unwrap().len(), 16);
}

#[test]
fn test_cycles_strict_fails() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();

    depscope(&home)
        .arg("cycles")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("demo/a -> demo/b -> demo/a"));

    depscope(&home)
        .args(["cycles", "--strict"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular"));
}

#[test]
fn test_compliance_reports_mismatch() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();

    let output = depscope(&home)
        .args(["--json", "compliance"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["filesScanned"], 2);
    assert_eq!(report["violations"][0]["file"], "src/Http/Request.php");
    assert_eq!(report["violations"][0]["expectedNamespace"], "Demo\\App\\Http");
    assert_eq!(report["violations"][0]["kind"], "mismatch");

    depscope(&home)
        .args(["compliance", "--strict"])
        .arg(project.path())
        .assert()
        .failure();
}

#[test]
fn test_namespaces_and_usage() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();

    depscope(&home)
        .arg("namespaces")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo\\App\\Web"));

    depscope(&home)
        .args(["usage", "Demo\\App\\Http"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/Kernel.php"));
}

#[test]
fn test_export_dot_to_file() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();
    let out = project.path().join("graph.dot");

    depscope(&home)
        .arg("export")
        .arg(project.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph dependencies"));
    assert!(dot.contains("\"demo/a\" -> \"demo/b\""));
}

#[test]
fn test_export_unknown_format_fails() {
    let home = TempDir::new().unwrap();
    let project = cyclic_project();

    depscope(&home)
        .args(["export", "--format", "yaml"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format"));
}

#[test]
fn test_export_focused_view() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write(project.path(), "composer.json", r#"{"name": "demo/app"}"#);
    write(
        project.path(),
        "composer.lock",
        r#"{
            "packages": [
                { "name": "demo/http", "version": "1.0.0", "require": { "psr/log": "^3.0" } },
                { "name": "psr/log", "version": "3.0.0" },
                { "name": "demo/cli", "version": "1.0.0" }
            ],
            "packages-dev": [
                { "name": "demo/tools", "version": "0.1.0", "require": { "demo/http": "^1.0" } }
            ]
        }"#,
    );

    let output = depscope(&home)
        .args(["export", "--format", "json", "--focus", "demo/http"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["demo/http", "psr/log"]);

    depscope(&home)
        .args(["export", "--no-dev"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("demo/cli"))
        .stdout(predicate::str::contains("demo/tools").not());

    depscope(&home)
        .args(["export", "--no-dev", "--focus", "demo/tools"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the locked graph"));
}

#[test]
fn test_shared_reports_conflicts() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write(
        workspace.path(),
        "shop/composer.json",
        r#"{"name": "acme/shop", "require": {"psr/log": "^3.0"}}"#,
    );
    write(
        workspace.path(),
        "blog/composer.json",
        r#"{"name": "acme/blog", "require": {"psr/log": "^2.0"}}"#,
    );

    let output = depscope(&home)
        .args(["--json", "shared"])
        .arg(workspace.path().join("shop"))
        .arg(workspace.path().join("blog"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sharedDependencies"]["psr/log"][1], "acme/blog");
    assert_eq!(report["versionConflicts"][0]["package"], "psr/log");

    depscope(&home)
        .args(["shared", "--strict"])
        .arg(workspace.path().join("shop"))
        .arg(workspace.path().join("blog"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("version conflict"));
}

#[test]
fn test_missing_manifest_fails() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();

    depscope(&home)
        .arg("deps")
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("composer.json"));
}

#[test]
fn test_config_reads_file_and_env() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    fs::write(&config, "log_level = \"warn\"\n\n[scan]\nmax_depth = 3\n").unwrap();

    depscope(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "log_level"])
        .assert()
        .success()
        .stdout("warn\n");

    depscope(&home)
        .env("DEPSCOPE_SCAN__MAX_DEPTH", "5")
        .args(["config", "scan.max_depth"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();

    depscope(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("depscope"));
}
