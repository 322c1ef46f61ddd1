//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;
use tsalias_config::SettingsLayer;

/// Rewrite tsconfig path aliases in compiled output into relative imports
#[derive(Parser, Debug)]
#[command(
    name = "tsalias",
    version,
    about = "Rewrite tsconfig path aliases in compiled output into relative imports",
    long_about = "Reads compilerOptions.paths from tsconfig.json and rewrites every aliased\n\
                  require/import/from specifier under outDir into a relative path that\n\
                  resolves at runtime. Run it after tsc."
)]
pub struct Cli {
    /// tsconfig.json, or a directory containing one
    #[arg(value_name = "PROJECT")]
    pub project: Option<PathBuf>,

    /// Compiled output directory (overrides compilerOptions.outDir)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Path-mapping base relative to the output directory
    #[arg(long, value_name = "DIR")]
    pub base_url: Option<PathBuf>,

    /// Source root (overrides compilerOptions.rootDir)
    #[arg(long, value_name = "DIR")]
    pub root_dir: Option<PathBuf>,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Settings given on the command line, as the top configuration layer.
    pub fn overrides(&self) -> SettingsLayer {
        SettingsLayer {
            out_dir: self.out_dir.clone(),
            base_url: self.base_url.clone(),
            root_dir: self.root_dir.clone(),
            paths: None,
            concurrency: self.concurrency,
            // Absent flag must not mask a lower layer
            dry_run: self.dry_run.then_some(true),
        }
    }
}
