//! cli::commands
//!
//! Command handlers. Each handler opens nothing itself; the dispatcher
//! resolves the database path (flag, then config file, then platform data
//! dir) and hands the handler an open store.

pub mod completion;
pub mod create;
pub mod delete;
pub mod init;
pub mod move_cmd;
pub mod patch_cmd;
pub mod show;

use anyhow::{Context as _, Result};

use crate::cli::args::{Cli, Command};
use crate::core::config::Config;
use crate::store::SqliteStore;

/// Dispatch a parsed command line.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        db,
        debug: _,
        quiet,
        command,
    } = cli;

    if let Command::Completion { shell } = &command {
        return completion::run(*shell);
    }

    let config = Config::load().context("failed to load configuration")?;
    let db_path = config.resolve_db_path(db.as_deref());

    if matches!(command, Command::Init) {
        return init::run(&db_path, quiet);
    }

    let mut store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open board database at {}", db_path.display()))?;

    match command {
        Command::Create(args) => create::run(&mut store, args.what, quiet),
        Command::Move(args) => move_cmd::run(&mut store, args.what, quiet),
        Command::Patch(args) => patch_cmd::run(&mut store, args, quiet),
        Command::Show { board } => show::run(&store, board),
        Command::Delete(args) => delete::run(&mut store, args, quiet),
        Command::Init | Command::Completion { .. } => unreachable!("handled above"),
    }
}
