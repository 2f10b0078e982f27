//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--db <path>`: Board database to operate on
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::core::model::ItemRef;
use crate::core::types::{CardId, ColumnId, TaskId};

/// corkboard - Kanban boards with a repositioning engine that keeps them tidy
#[derive(Parser, Debug)]
#[command(name = "cb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Board database to operate on (defaults to config, then data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the board database
    Init,

    /// Create a board, column, card or task
    Create(CreateArgs),

    /// Move an item to a rank, possibly into another parent
    Move(MoveArgs),

    /// Apply an RFC 6902 patch document (replace ops) to an item
    Patch(PatchArgs),

    /// Print a board with its columns, cards and tasks
    Show {
        /// Board id
        board: i64,
    },

    /// Delete an item (siblings keep their positions)
    Delete(DeleteArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(subcommand)]
    pub what: CreateCommand,
}

#[derive(Subcommand, Debug)]
pub enum CreateCommand {
    /// Create a board
    Board {
        /// Board name
        name: String,
        /// Hide the board from non-participants
        #[arg(long)]
        private: bool,
    },
    /// Create a column at the end of a board
    Column {
        /// Owning board id
        #[arg(long)]
        board: i64,
        /// Column title
        title: String,
        /// Work-in-progress limit
        #[arg(long)]
        wip_limit: Option<i64>,
    },
    /// Create a card at the end of a column
    Card {
        /// Owning column id
        #[arg(long)]
        column: i64,
        /// Card title
        title: String,
        /// Card description
        #[arg(long, default_value = "")]
        description: String,
        /// Due date (RFC 3339)
        #[arg(long)]
        due: Option<String>,
        /// Effort estimate
        #[arg(long, default_value_t = 0.0)]
        estimate: f64,
    },
    /// Create a task at the end of a card
    Task {
        /// Owning card id
        #[arg(long)]
        card: i64,
        /// Task title
        title: String,
    },
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    #[command(subcommand)]
    pub what: MoveCommand,
}

#[derive(Subcommand, Debug)]
pub enum MoveCommand {
    /// Reorder a column within its board
    Column {
        /// Column id
        id: i64,
        /// Target rank (1-based; clamped to the scope)
        #[arg(long)]
        rank: i64,
    },
    /// Move a card within or between columns of its board
    Card {
        /// Card id
        id: i64,
        /// Target column (defaults to the card's current column)
        #[arg(long)]
        column: Option<i64>,
        /// Target rank (1-based; clamped to the scope)
        #[arg(long)]
        rank: i64,
    },
    /// Move a task within or between cards of its board
    Task {
        /// Task id
        id: i64,
        /// Target card (defaults to the task's current card)
        #[arg(long)]
        card: Option<i64>,
        /// Target rank (1-based; clamped to the scope)
        #[arg(long)]
        rank: i64,
    },
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Kind of item to patch
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Item id
    pub id: i64,
    /// RFC 6902 document, or `-` to read it from stdin
    pub patch: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Kind of item to delete
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Item id
    pub id: i64,
}

/// Item kind as a CLI value.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Column,
    Card,
    Task,
}

impl KindArg {
    /// Typed reference for an id of this kind.
    pub fn item_ref(&self, id: i64) -> ItemRef {
        match self {
            KindArg::Column => ItemRef::Column(ColumnId::new(id)),
            KindArg::Card => ItemRef::Card(CardId::new(id)),
            KindArg::Task => ItemRef::Task(TaskId::new(id)),
        }
    }
}
