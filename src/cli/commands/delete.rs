//! delete command - Remove an item.
//!
//! Surviving siblings keep their positions; the gap is repaired by the next
//! repositioning in that scope.

use anyhow::Result;

use crate::cli::args::DeleteArgs;
use crate::store::SqliteStore;

pub fn run(store: &mut SqliteStore, args: DeleteArgs, quiet: bool) -> Result<()> {
    let item = args.kind.item_ref(args.id);
    store.delete_item(item)?;
    if !quiet {
        println!("deleted {item}");
    }
    Ok(())
}
