//! create command - Create boards, columns, cards and tasks.
//!
//! New items are appended at the end of their scope; the store assigns
//! `max(sibling positions) + 1` inside the creating transaction.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};

use crate::cli::args::CreateCommand;
use crate::core::types::{BoardId, CardId, ColumnId};
use crate::store::{NewCard, NewColumn, NewTask, SqliteStore};

/// Create one entity and print its id.
pub fn run(store: &mut SqliteStore, cmd: CreateCommand, quiet: bool) -> Result<()> {
    match cmd {
        CreateCommand::Board { name, private } => {
            let board = store.create_board(&name, private)?;
            if !quiet {
                println!("created board {} ({})", board.id, board.name);
            }
        }
        CreateCommand::Column {
            board,
            title,
            wip_limit,
        } => {
            let column = store.create_column(
                BoardId::new(board),
                NewColumn { title, wip_limit },
            )?;
            if !quiet {
                println!(
                    "created column {} at position {}",
                    column.id, column.position
                );
            }
        }
        CreateCommand::Card {
            column,
            title,
            description,
            due,
            estimate,
        } => {
            let due_date = due.map(parse_due).transpose()?;
            let card = store.create_card(
                ColumnId::new(column),
                NewCard {
                    title,
                    description,
                    due_date,
                    estimate,
                },
            )?;
            if !quiet {
                println!("created card {} at position {}", card.id, card.position);
            }
        }
        CreateCommand::Task { card, title } => {
            let task = store.create_task(CardId::new(card), NewTask { title })?;
            if !quiet {
                println!("created task {} at position {}", task.id, task.position);
            }
        }
    }
    Ok(())
}

fn parse_due(raw: String) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .with_context(|| format!("due date '{raw}' is not an RFC 3339 timestamp"))?;
    Ok(parsed.with_timezone(&Utc))
}
