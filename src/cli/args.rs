//! CLI argument definitions using clap
//!
//! Commands:
//! - itemstore init --config <path>
//! - itemstore serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// itemstore - CRUD HTTP service for Item records
#[derive(Parser, Debug)]
#[command(name = "itemstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the items table and exit
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./itemstore.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./itemstore.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
