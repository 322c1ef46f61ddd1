//! # tsalias-core
//!
//! Rewrites tsconfig path aliases (`@app/*` and friends) in compiled output
//! into relative imports that resolve at runtime.
//!
//! The compiler leaves `import x from '@app/utils'` untouched in emitted
//! files, but aliases mean nothing to Node or a browser. A run walks the
//! output tree, finds every `require`/`import`/`from` specifier that starts
//! with a known alias, locates the module on disk under the output tree and
//! replaces the specifier with a relative path such as `../app/utils`.
//!
//! ## Pipeline
//!
//! ```text
//! RunOptions ──▶ RunConfig (AliasTable) ──▶ discover_files(out_dir)
//!                                                   │
//!                        BatchScheduler (N workers) ◀┘
//!                                   │ per file
//!                     Rewriter ──▶ ModuleResolver ──▶ ResolutionCache / Runtime
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tsalias_core::{run, NativeRuntime, RunOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RunOptions::new("/path/to/project", "dist").alias("@app/*", ["app/*"]);
//! let report = run(options, Arc::new(NativeRuntime::new())).await?;
//! println!("rewrote {} files", report.files_rewritten());
//! # Ok(()) }
//! ```

pub mod alias;
pub mod cache;
pub mod context;
pub mod discover;
pub mod paths;
pub mod report;
pub mod resolver;
pub mod rewriter;
pub mod runtime;
pub mod scanner;
pub mod scheduler;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

pub use alias::{AliasEntry, AliasError, AliasKind, AliasMatch, AliasTable, AliasTarget};
pub use cache::{CacheStats, ResolutionCache};
pub use context::{RewriteContext, RunConfig, RunOptions};
pub use discover::discover_files;
pub use report::{FileError, FileOutcome, FileReport, RunReport};
pub use resolver::{ModuleResolver, Resolution};
pub use rewriter::{Rewriter, Rewritten, UnresolvedImport};
pub use runtime::native::NativeRuntime;
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};
pub use scheduler::{BatchScheduler, DEFAULT_CONCURRENCY};

/// Errors that abort a run before any file is modified.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path alias configuration cannot be compiled
    #[error("Invalid path alias configuration: {0}\n\nHint: Check compilerOptions.paths in tsconfig.json")]
    Alias(#[from] AliasError),

    /// The compiled output tree does not exist
    #[error("Output directory not found: {}\n\nHint: Run the TypeScript compiler before rewriting aliases", .0.display())]
    OutDirNotFound(PathBuf),

    /// Filesystem error while enumerating the output tree
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Result type alias for tsalias operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rewrite every aliased import under the configured output directory.
///
/// Configuration problems are returned as errors before any file is read.
/// Per-file faults and unresolved imports never abort the run; they are
/// collected in the returned [`RunReport`].
pub async fn run(options: RunOptions, runtime: Arc<dyn Runtime>) -> Result<RunReport> {
    let started = Instant::now();
    let config = RunConfig::from_options(options)?;

    if !runtime.exists(&config.out_dir) {
        return Err(Error::OutDirNotFound(config.out_dir));
    }

    info!(
        out_dir = %config.out_dir.display(),
        root_dir = %config.root_dir.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
        aliases = config.aliases.len(),
        "Rewriting path aliases"
    );

    let dry_run = config.dry_run;
    if config.aliases.is_empty() {
        info!("No path aliases configured, nothing to rewrite");
        return Ok(RunReport {
            elapsed: started.elapsed(),
            dry_run,
            ..RunReport::default()
        });
    }

    let files = discover_files(runtime.as_ref(), &config.out_dir).await?;
    debug!(files = files.len(), "Discovered emitted files");

    let scheduler = BatchScheduler::new(config.concurrency);
    let context = Arc::new(RewriteContext::new(config, runtime));
    let batch = scheduler.run(Arc::clone(&context), files).await;

    let report = RunReport {
        files: batch.files,
        panics: batch.panics,
        cache: context.cache.stats(),
        elapsed: started.elapsed(),
        dry_run,
    };

    info!(
        scanned = report.files_scanned(),
        rewritten = report.files_rewritten(),
        replacements = report.replacements(),
        unresolved = report.unresolved().count(),
        failed = report.failures().count(),
        "Alias rewrite finished"
    );

    Ok(report)
}
