//! Command-line front end for tsalias.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - the rewrite command
//! - [`error`] - error types with actionable messages
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines and the run summary

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
