//! cli
//!
//! Command-line interface layer for corkboard.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT reorder or patch anything directly
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] entry points; all ordering mutations flow through the
//! store's transactional boundary.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);
    commands::dispatch(cli)
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "corkboard=debug" } else { "corkboard=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
