//! The rewrite command.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tsalias_core::{NativeRuntime, RunReport, Runtime};

use crate::cli::Cli;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Load settings for the current directory and rewrite aliases.
///
/// Configuration problems and a missing output directory are errors.
/// Unresolved imports and per-file failures are reported but do not fail
/// the command.
pub async fn execute(args: Cli) -> Result<()> {
    let runtime: Arc<dyn Runtime> = Arc::new(NativeRuntime::new());
    let cwd = runtime
        .get_cwd()
        .context("Failed to determine the working directory")?;
    let report = run_in(&args, &cwd, runtime).await?;

    if !args.quiet {
        ui::print_summary(&report);
        if report.files_rewritten() > 0 && !report.dry_run {
            ui::success(&format!(
                "Rewrote {} aliased imports in {} files",
                report.replacements(),
                report.files_rewritten()
            ));
        }
    }

    Ok(())
}

/// Run the command against an explicit working directory and filesystem.
pub async fn run_in(args: &Cli, cwd: &Path, runtime: Arc<dyn Runtime>) -> Result<RunReport> {
    let options = tsalias_config::load(args.project.as_deref(), cwd, &args.overrides())?;
    debug!(
        project_dir = %options.project_dir.display(),
        out_dir = %options.out_dir.display(),
        concurrency = options.concurrency,
        "Resolved settings"
    );

    if options.dry_run && !args.quiet {
        ui::info("Dry run: no files will be written");
    }

    let report = tsalias_core::run(options, runtime).await?;
    Ok(report)
}
