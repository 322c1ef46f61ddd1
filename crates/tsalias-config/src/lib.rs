//! # tsalias-config
//!
//! Finds a project's tsconfig.json, reads the compiler options alias
//! rewriting depends on and layers environment and command-line overrides
//! on top of them.
//!
//! ```no_run
//! use std::path::Path;
//! use tsalias_config::{load, SettingsLayer};
//!
//! let options = load(None, Path::new("."), &SettingsLayer::default())?;
//! println!("rewriting {}", options.out_dir.display());
//! # Ok::<(), tsalias_config::ConfigError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod jsonc;
pub mod settings;
pub mod tsconfig;

use std::path::Path;

use tracing::debug;
use tsalias_core::RunOptions;

pub use discovery::{TSCONFIG_FILE, TsConfigDiscovery};
pub use error::{ConfigError, Result};
pub use jsonc::strip_jsonc;
pub use settings::{ENV_PREFIX, Settings, SettingsLayer};
pub use tsconfig::{CompilerOptions, TsConfig};

/// Discover the tsconfig, merge every settings layer and produce run options.
///
/// `project` is the tsconfig file or its directory, relative to `cwd`.
pub fn load(project: Option<&Path>, cwd: &Path, overrides: &SettingsLayer) -> Result<RunOptions> {
    let (path, tsconfig) = TsConfigDiscovery::new(cwd).load(project)?;
    debug!(tsconfig = %path.display(), "Loaded tsconfig");

    let project_dir = path.parent().unwrap_or(cwd);
    Settings::load(tsconfig.compiler_options, overrides)?.into_run_options(project_dir)
}
