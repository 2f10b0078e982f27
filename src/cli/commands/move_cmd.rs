//! move command - Reposition an item within or across scopes.

use anyhow::{anyhow, Result};

use crate::cli::args::MoveCommand;
use crate::core::model::{ItemRef, ScopeRef};
use crate::core::types::{CardId, ColumnId, Rank, TaskId};
use crate::engine;
use crate::store::SqliteStore;

/// Resolve the target scope and delegate to the engine.
///
/// When no target parent is given, the item moves within its current one.
pub fn run(store: &mut SqliteStore, cmd: MoveCommand, quiet: bool) -> Result<()> {
    let (item, target, rank) = match cmd {
        MoveCommand::Column { id, rank } => {
            let item = ItemRef::Column(ColumnId::new(id));
            (item, current_parent(store, item)?, rank)
        }
        MoveCommand::Card { id, column, rank } => {
            let item = ItemRef::Card(CardId::new(id));
            let target = match column {
                Some(column) => ScopeRef::Column(ColumnId::new(column)),
                None => current_parent(store, item)?,
            };
            (item, target, rank)
        }
        MoveCommand::Task { id, card, rank } => {
            let item = ItemRef::Task(TaskId::new(id));
            let target = match card {
                Some(card) => ScopeRef::Card(CardId::new(card)),
                None => current_parent(store, item)?,
            };
            (item, target, rank)
        }
    };

    let outcome = engine::move_item(store, item, target, Rank::clamped(rank))?;
    if !quiet {
        println!("moved {} to {} at rank {}", outcome.item, outcome.to, rank.max(1));
    }
    Ok(())
}

fn current_parent(store: &SqliteStore, item: ItemRef) -> Result<ScopeRef> {
    let loaded = store
        .item(item)?
        .ok_or_else(|| anyhow!("no such {}", item))?;
    Ok(loaded.parent())
}
