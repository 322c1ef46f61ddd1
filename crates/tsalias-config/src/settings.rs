//! Layered run settings.
//!
//! Sources are merged with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `compilerOptions` of the tsconfig
//! 3. `TSALIAS_*` environment variables
//! 4. Command-line overrides

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tsalias_core::{DEFAULT_CONCURRENCY, RunOptions};

use crate::error::{ConfigError, Result};
use crate::tsconfig::CompilerOptions;

/// Prefix of the environment variables read as a settings layer.
pub const ENV_PREFIX: &str = "TSALIAS_";

const ENV_KEYS: [&str; 4] = ["out_dir", "base_url", "root_dir", "concurrency"];

/// Fully merged settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,
    #[serde(default)]
    pub paths: IndexMap<String, Vec<String>>,
    pub concurrency: usize,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out_dir: None,
            base_url: None,
            root_dir: None,
            paths: IndexMap::new(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }
}

/// One partial layer; unset fields leave lower layers untouched.
///
/// The CLI builds one of these from its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl From<CompilerOptions> for SettingsLayer {
    fn from(options: CompilerOptions) -> Self {
        Self {
            out_dir: options.out_dir,
            base_url: options.base_url,
            root_dir: options.root_dir,
            paths: options.paths,
            ..Self::default()
        }
    }
}

impl Settings {
    /// Merge defaults, the tsconfig layer, environment and overrides.
    pub fn load(tsconfig: CompilerOptions, overrides: &SettingsLayer) -> Result<Self> {
        let settings: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Serialized::defaults(SettingsLayer::from(tsconfig)))
            .merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|e| ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!(
                    "Check compilerOptions in tsconfig.json and {}* environment variables",
                    ENV_PREFIX
                ),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.out_dir.is_none() {
            return Err(ConfigError::MissingField {
                field: "compilerOptions.outDir".to_string(),
                hint: format!(
                    "Set outDir in tsconfig.json, {}OUT_DIR or pass --out-dir",
                    ENV_PREFIX
                ),
            });
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency".to_string(),
                value: "0".to_string(),
                hint: "Use at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Turn validated settings into run options anchored at `project_dir`.
    pub fn into_run_options(self, project_dir: &Path) -> Result<RunOptions> {
        let out_dir = self.out_dir.ok_or_else(|| ConfigError::MissingField {
            field: "compilerOptions.outDir".to_string(),
            hint: "Set outDir in tsconfig.json".to_string(),
        })?;

        Ok(RunOptions {
            base_url: self.base_url,
            root_dir: self.root_dir,
            paths: self.paths,
            concurrency: self.concurrency,
            dry_run: self.dry_run,
            ..RunOptions::new(project_dir, out_dir)
        })
    }
}
