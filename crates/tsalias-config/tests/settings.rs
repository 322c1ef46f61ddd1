//! Settings layering. Every test reads the process environment, so all of
//! them run serially.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serial_test::serial;
use tempfile::TempDir;
use tsalias_config::{CompilerOptions, ConfigError, Settings, SettingsLayer, load};
use tsalias_core::DEFAULT_CONCURRENCY;

const VARS: [&str; 4] = [
    "TSALIAS_OUT_DIR",
    "TSALIAS_BASE_URL",
    "TSALIAS_ROOT_DIR",
    "TSALIAS_CONCURRENCY",
];

fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

fn compiler_options(out_dir: Option<&str>) -> CompilerOptions {
    let mut paths = IndexMap::new();
    paths.insert("@app/*".to_string(), vec!["app/*".to_string()]);
    CompilerOptions {
        out_dir: out_dir.map(PathBuf::from),
        base_url: Some(PathBuf::from(".")),
        root_dir: Some(PathBuf::from("src")),
        paths: Some(paths),
    }
}

#[test]
#[serial]
fn test_tsconfig_values_over_defaults() {
    clear_env();

    let settings = Settings::load(compiler_options(Some("dist")), &SettingsLayer::default()).unwrap();
    assert_eq!(settings.out_dir, Some(PathBuf::from("dist")));
    assert_eq!(settings.root_dir, Some(PathBuf::from("src")));
    assert_eq!(settings.paths["@app/*"], vec!["app/*"]);
    assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
    assert!(!settings.dry_run);
}

#[test]
#[serial]
fn test_env_overrides_tsconfig() {
    clear_env();
    unsafe {
        std::env::set_var("TSALIAS_OUT_DIR", "build");
        std::env::set_var("TSALIAS_CONCURRENCY", "8");
    }

    let settings = Settings::load(compiler_options(Some("dist")), &SettingsLayer::default());
    clear_env();

    let settings = settings.unwrap();
    assert_eq!(settings.out_dir, Some(PathBuf::from("build")));
    assert_eq!(settings.concurrency, 8);
}

#[test]
#[serial]
fn test_overrides_beat_env() {
    clear_env();
    unsafe { std::env::set_var("TSALIAS_OUT_DIR", "build") };

    let overrides = SettingsLayer {
        out_dir: Some(PathBuf::from("cli-out")),
        dry_run: Some(true),
        ..SettingsLayer::default()
    };
    let settings = Settings::load(compiler_options(Some("dist")), &overrides);
    clear_env();

    let settings = settings.unwrap();
    assert_eq!(settings.out_dir, Some(PathBuf::from("cli-out")));
    assert!(settings.dry_run);
    // Untouched fields fall through to the tsconfig layer
    assert_eq!(settings.root_dir, Some(PathBuf::from("src")));
}

#[test]
#[serial]
fn test_missing_out_dir() {
    clear_env();

    let err = Settings::load(compiler_options(None), &SettingsLayer::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "compilerOptions.outDir"));
}

#[test]
#[serial]
fn test_zero_concurrency_rejected() {
    clear_env();

    let overrides = SettingsLayer {
        concurrency: Some(0),
        ..SettingsLayer::default()
    };
    let err = Settings::load(compiler_options(Some("dist")), &overrides).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "concurrency"));
}

#[test]
#[serial]
fn test_non_numeric_concurrency_env() {
    clear_env();
    unsafe { std::env::set_var("TSALIAS_CONCURRENCY", "lots") };

    let result = Settings::load(compiler_options(Some("dist")), &SettingsLayer::default());
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
#[serial]
fn test_load_anchors_at_tsconfig_dir() {
    clear_env();
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("web")).unwrap();
    fs::write(
        temp.path().join("web/tsconfig.json"),
        r#"{ "compilerOptions": { "outDir": "dist", "paths": { "@/*": ["*"] } } }"#,
    )
    .unwrap();

    let options = load(Some(Path::new("web")), temp.path(), &SettingsLayer::default()).unwrap();
    assert_eq!(options.project_dir, temp.path().join("web"));
    assert_eq!(options.out_dir, Path::new("dist"));
    assert_eq!(options.paths["@/*"], vec!["*"]);
    assert_eq!(options.base_url, None);
}
