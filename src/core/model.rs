//! core::model
//!
//! Domain entities and the tagged references the engine operates on.
//!
//! # Entities
//!
//! - [`Board`] - root aggregate, owns ordered columns
//! - [`Column`] - ordered within a board, owns ordered cards
//! - [`Card`] - ordered within a column, owns ordered tasks
//! - [`Task`] - ordered within a card
//!
//! Entities only come into existence through the store (insert/load), so an
//! entity value in hand reflects a persisted row. The engine never works with
//! half-constructed records; a reference to a row that no longer exists
//! surfaces as a validation error at the store boundary.
//!
//! # References
//!
//! [`ItemRef`] and [`ScopeRef`] are the sum-typed handles passed across the
//! engine boundary. The kind travels with the id, so "is this really a
//! column?" is answered by the type system instead of runtime probing.
//!
//! # Serialization
//!
//! Entities serialize with camelCase field names (`columnId`, `dueDate`,
//! `wipLimit`), which is also the path vocabulary of the patch applier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::{ItemKind, ScopeKind};
use super::types::{BoardId, CardId, ColumnId, Position, TaskId};

/// A board: the root aggregate that owns ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A column within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub position: Position,
    pub title: String,
    pub wip_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card within a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub column_id: ColumnId,
    pub position: Position,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub estimate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task within a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub card_id: CardId,
    pub position: Position,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tagged reference to an orderable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRef {
    Column(ColumnId),
    Card(CardId),
    Task(TaskId),
}

impl ItemRef {
    /// Build a reference of the given kind from a raw row id.
    pub fn from_raw(kind: ItemKind, id: i64) -> Self {
        match kind {
            ItemKind::Column => ItemRef::Column(ColumnId::new(id)),
            ItemKind::Card => ItemRef::Card(CardId::new(id)),
            ItemKind::Task => ItemRef::Task(TaskId::new(id)),
        }
    }

    /// The kind of the referenced item.
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Column(_) => ItemKind::Column,
            ItemRef::Card(_) => ItemKind::Card,
            ItemRef::Task(_) => ItemKind::Task,
        }
    }

    /// The raw row id.
    pub fn raw_id(&self) -> i64 {
        match self {
            ItemRef::Column(id) => id.get(),
            ItemRef::Card(id) => id.get(),
            ItemRef::Task(id) => id.get(),
        }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw_id())
    }
}

/// Tagged reference to a parent scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeRef {
    Board(BoardId),
    Column(ColumnId),
    Card(CardId),
}

impl ScopeRef {
    /// Build a reference of the given kind from a raw row id.
    pub fn from_raw(kind: ScopeKind, id: i64) -> Self {
        match kind {
            ScopeKind::Board => ScopeRef::Board(BoardId::new(id)),
            ScopeKind::Column => ScopeRef::Column(ColumnId::new(id)),
            ScopeKind::Card => ScopeRef::Card(CardId::new(id)),
        }
    }

    /// The kind of the referenced scope.
    pub fn kind(&self) -> ScopeKind {
        match self {
            ScopeRef::Board(_) => ScopeKind::Board,
            ScopeRef::Column(_) => ScopeKind::Column,
            ScopeRef::Card(_) => ScopeKind::Card,
        }
    }

    /// The raw row id.
    pub fn raw_id(&self) -> i64 {
        match self {
            ScopeRef::Board(id) => id.get(),
            ScopeRef::Column(id) => id.get(),
            ScopeRef::Card(id) => id.get(),
        }
    }
}

impl std::fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw_id())
    }
}

/// A loaded orderable item of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Column(Column),
    Card(Card),
    Task(Task),
}

impl Item {
    /// The kind of this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Column(_) => ItemKind::Column,
            Item::Card(_) => ItemKind::Card,
            Item::Task(_) => ItemKind::Task,
        }
    }

    /// Reference to this item.
    pub fn item_ref(&self) -> ItemRef {
        match self {
            Item::Column(column) => ItemRef::Column(column.id),
            Item::Card(card) => ItemRef::Card(card.id),
            Item::Task(task) => ItemRef::Task(task.id),
        }
    }

    /// Reference to the scope this item currently belongs to.
    pub fn parent(&self) -> ScopeRef {
        match self {
            Item::Column(column) => ScopeRef::Board(column.board_id),
            Item::Card(card) => ScopeRef::Column(card.column_id),
            Item::Task(task) => ScopeRef::Card(task.card_id),
        }
    }

    /// The item's current position among its siblings.
    pub fn position(&self) -> Position {
        match self {
            Item::Column(column) => column.position,
            Item::Card(card) => card.position,
            Item::Task(task) => task.position,
        }
    }
}
