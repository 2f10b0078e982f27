//! show command - Print a board tree.

use anyhow::{anyhow, Result};

use crate::core::types::BoardId;
use crate::store::SqliteStore;

/// Print a board with its columns, cards and tasks, in position order.
pub fn run(store: &SqliteStore, board: i64) -> Result<()> {
    let board_id = BoardId::new(board);
    let board = store
        .board(board_id)?
        .ok_or_else(|| anyhow!("no such board: {board}"))?;

    let visibility = if board.private { " (private)" } else { "" };
    println!("board {}: {}{}", board.id, board.name, visibility);

    for column in store.columns_of(board_id)? {
        match column.wip_limit {
            Some(limit) => println!("  {}. {} [wip {}]", column.position, column.title, limit),
            None => println!("  {}. {}", column.position, column.title),
        }
        for card in store.cards_of(column.id)? {
            let mut line = format!("    {}. {}", card.position, card.title);
            if card.estimate > 0.0 {
                line.push_str(&format!(" [{}pt]", card.estimate));
            }
            if let Some(due) = card.due_date {
                line.push_str(&format!(" [due {}]", due.format("%Y-%m-%d")));
            }
            println!("{line}");
            for task in store.tasks_of(card.id)? {
                let check = if task.done { "x" } else { " " };
                println!("      [{}] {}. {}", check, task.position, task.title);
            }
        }
    }
    Ok(())
}
