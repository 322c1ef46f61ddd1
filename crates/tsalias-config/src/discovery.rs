//! Locating the tsconfig for a project argument.

use std::path::{Path, PathBuf};

use tsalias_core::paths::absolutize;

use crate::error::{ConfigError, Result};
use crate::tsconfig::TsConfig;

/// Default tsconfig file name.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Finds and loads the tsconfig a run is based on.
///
/// # Example
///
/// ```no_run
/// use tsalias_config::TsConfigDiscovery;
///
/// let discovery = TsConfigDiscovery::new(".");
/// let (path, config) = discovery.load(None).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TsConfigDiscovery {
    cwd: PathBuf,
}

impl TsConfigDiscovery {
    /// Create a discovery anchored at the working directory.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Resolve the tsconfig path.
    ///
    /// `project` may name a file or a directory holding `tsconfig.json`;
    /// `None` means `tsconfig.json` in the working directory.
    pub fn find(&self, project: Option<&Path>) -> Result<PathBuf> {
        let project = project.unwrap_or(Path::new(TSCONFIG_FILE));
        let mut path = absolutize(project, &self.cwd);
        if path.is_dir() {
            path = path.join(TSCONFIG_FILE);
        }

        if path.is_file() {
            Ok(path)
        } else {
            Err(ConfigError::NotFound(path))
        }
    }

    /// Find and parse the tsconfig, returning its path as well.
    pub fn load(&self, project: Option<&Path>) -> Result<(PathBuf, TsConfig)> {
        let path = self.find(project)?;
        let config = TsConfig::from_file(&path)?;
        Ok((path, config))
    }
}
