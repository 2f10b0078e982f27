//! init command - Create the board database.

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::store::SqliteStore;

/// Create (or re-open, which is harmless) the board database.
pub fn run(db_path: &Path, quiet: bool) -> Result<()> {
    SqliteStore::open(db_path)
        .with_context(|| format!("failed to create board database at {}", db_path.display()))?;
    if !quiet {
        println!("board database ready at {}", db_path.display());
    }
    Ok(())
}
