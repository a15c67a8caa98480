//! CLI module for itemstore
//!
//! Provides command-line interface for:
//! - init: Create the items table
//! - serve: Boot and serve the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
