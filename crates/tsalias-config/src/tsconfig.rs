//! The subset of tsconfig.json that alias rewriting needs.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::jsonc::strip_jsonc;

/// Parsed tsconfig.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub compiler_options: CompilerOptions,
    /// Recorded so it can be reported; inherited configs are not loaded
    pub extends: Option<String>,
}

/// `compilerOptions` fields relevant to alias rewriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub out_dir: Option<PathBuf>,
    pub base_url: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
    pub paths: Option<IndexMap<String, Vec<String>>>,
}

impl TsConfig {
    /// Parse tsconfig content; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(&strip_jsonc(content)).map_err(|source| ConfigError::InvalidJson {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse a tsconfig file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config = Self::parse(&content, path)?;
        if let Some(extends) = &config.extends {
            warn!(
                extends = %extends,
                "tsconfig extends another config; only options in {} are used",
                path.display()
            );
        }
        Ok(config)
    }
}
