//! End-to-end tests of the tsalias binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TSCONFIG: &str = r#"{
  // compiled by tsc into dist/
  "compilerOptions": {
    "outDir": "dist",
    "rootDir": "src",
    "paths": {
      "@app/*": ["app/*"],
    },
  },
}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tsconfig.json", TSCONFIG);
    write(temp.path(), "dist/app/utils.js", "exports.a = 1;\n");
    write(temp.path(), "dist/pages/home.js", "const u = require(\"@app/utils\");\n");
    write(temp.path(), "dist/pages/broken.js", "const m = require('@app/missing');\n");
    temp
}

fn tsalias(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tsalias").unwrap();
    cmd.current_dir(cwd).env("NO_COLOR", "1").env_remove("RUST_LOG");
    for var in ["TSALIAS_OUT_DIR", "TSALIAS_BASE_URL", "TSALIAS_ROOT_DIR", "TSALIAS_CONCURRENCY"] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_rewrites_project_in_cwd() {
    let temp = project();

    tsalias(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Alias Rewrite Summary"))
        .stderr(predicate::str::contains("Source file not found for module @app/missing"));

    assert_eq!(
        fs::read_to_string(temp.path().join("dist/pages/home.js")).unwrap(),
        "const u = require(\"../app/utils\");\n"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("dist/pages/broken.js")).unwrap(),
        "const m = require('@app/missing');\n"
    );
}

#[test]
fn test_project_argument_from_other_directory() {
    let temp = project();
    let elsewhere = TempDir::new().unwrap();

    tsalias(elsewhere.path())
        .arg(temp.path())
        .arg("--no-color")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("dist/pages/home.js")).unwrap(),
        "const u = require(\"../app/utils\");\n"
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = project();

    tsalias(temp.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Would rewrite"));

    assert_eq!(
        fs::read_to_string(temp.path().join("dist/pages/home.js")).unwrap(),
        "const u = require(\"@app/utils\");\n"
    );
}

#[test]
fn test_quiet_prints_no_summary() {
    let temp = project();

    tsalias(temp.path())
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("Summary").not());
}

#[test]
fn test_missing_tsconfig_fails() {
    let temp = TempDir::new().unwrap();

    tsalias(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_missing_out_dir_fails() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tsconfig.json", TSCONFIG);

    tsalias(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output directory not found"));
}

#[test]
fn test_out_dir_flag_overrides_tsconfig() {
    let temp = project();
    write(temp.path(), "build/app/utils.js", "");
    write(temp.path(), "build/index.js", "import '@app/utils';\n");

    tsalias(temp.path())
        .args(["--out-dir", "build"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("build/index.js")).unwrap(),
        "import './app/utils';\n"
    );
    // dist/ is not touched
    assert_eq!(
        fs::read_to_string(temp.path().join("dist/pages/home.js")).unwrap(),
        "const u = require(\"@app/utils\");\n"
    );
}

#[test]
fn test_env_concurrency_zero_rejected() {
    let temp = project();

    tsalias(temp.path())
        .env("TSALIAS_CONCURRENCY", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}
