//! patch command - Apply an RFC 6902 document to an item.

use std::io::Read;

use anyhow::{Context as _, Result};

use crate::cli::args::PatchArgs;
use crate::engine::{self, PatchSet};
use crate::store::SqliteStore;

/// Parse the patch document (from the argument or stdin) and apply it.
pub fn run(store: &mut SqliteStore, args: PatchArgs, quiet: bool) -> Result<()> {
    let raw = if args.patch == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read patch document from stdin")?;
        buffer
    } else {
        args.patch
    };

    let patch = PatchSet::from_json(&raw)?;
    let item = args.kind.item_ref(args.id);
    let outcome = engine::apply_patch(store, item, &patch)?;

    if !quiet {
        match outcome.moved {
            Some(moved) => println!("patched {} and moved it to {}", outcome.item, moved.to),
            None => println!("patched {}", outcome.item),
        }
    }
    Ok(())
}
