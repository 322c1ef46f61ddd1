//! tsalias - rewrite tsconfig path aliases in compiled output.

use clap::Parser;
use miette::Result;
use tsalias_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    commands::replace_execute(args)
        .await
        .map_err(error::cli_error_to_miette)
}
