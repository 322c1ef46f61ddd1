//! Error types for the tsalias binary.
//!
//! Library errors convert into [`CliError`] through `#[from]`; `main` turns
//! the final error into a miette report.

use miette::Report;
use thiserror::Error;
use tsalias_config::ConfigError;
use tsalias_core::RuntimeError;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// tsconfig discovery, parsing or settings problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A run that could not start (bad alias table, missing outDir)
    #[error("Rewrite failed: {0}")]
    Run(#[from] tsalias_core::Error),

    /// Filesystem access outside a run, e.g. reading the working directory
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

/// Convert a CLI error into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        // The wrapped messages already carry their own "Hint:" lines
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Run(e) => miette::miette!("{}", e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_error_from_config_error() {
        let err: CliError = ConfigError::NotFound(PathBuf::from("tsconfig.json")).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("Hint:"));
    }

    #[test]
    fn test_cli_error_from_run_error() {
        let err: CliError = tsalias_core::Error::OutDirNotFound(PathBuf::from("/p/dist")).into();
        assert!(matches!(err, CliError::Run(_)));
        assert!(err.to_string().contains("/p/dist"));
    }

    #[test]
    fn test_result_ext_context_on_runtime_error() {
        let result: std::result::Result<(), RuntimeError> =
            Err(RuntimeError::Io("Failed to get current directory: gone".to_string()));

        let err = result.context("Failed to determine the working directory").unwrap_err();
        assert!(matches!(err, CliError::Custom(_)));
        assert_eq!(
            err.to_string(),
            "Failed to determine the working directory: I/O error: Failed to get current directory: gone"
        );
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::NotFound(PathBuf::from("tsconfig.json")));

        let msg = result.context("Failed to load settings").unwrap_err().to_string();
        assert!(msg.starts_with("Failed to load settings: "));
    }

    #[test]
    fn test_miette_report_keeps_hint() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::MissingField {
            field: "compilerOptions.outDir".to_string(),
            hint: "Set outDir".to_string(),
        }));
        let msg = report.to_string();
        assert!(msg.contains("compilerOptions.outDir"));
        assert!(msg.contains("Hint: Set outDir"));
    }
}
