//! core::profile
//!
//! Ordering profiles for the orderable item kinds.
//!
//! # Architecture
//!
//! A profile is the capability description that parameterizes the single
//! generic repositioning algorithm: which kind of item is ordered, which kind
//! of parent owns the scope, where the rows live, and whether a move may also
//! change the item's parent. One algorithm plus three profiles replaces three
//! near-identical per-kind routines.
//!
//! # Example
//!
//! ```
//! use corkboard::core::profile::{CrossScope, ItemKind};
//!
//! let profile = ItemKind::Card.profile();
//! assert_eq!(profile.parent_fk, "column_id");
//! assert_eq!(profile.cross_scope, CrossScope::Allowed);
//!
//! // Columns are pinned to their board.
//! assert_eq!(ItemKind::Column.profile().cross_scope, CrossScope::Forbidden);
//! ```

use serde::{Deserialize, Serialize};

/// The orderable item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A column, ordered within a board.
    Column,
    /// A card, ordered within a column.
    Card,
    /// A task, ordered within a card.
    Task,
}

impl ItemKind {
    /// The ordering profile for this kind.
    pub fn profile(&self) -> &'static OrderingProfile {
        match self {
            ItemKind::Column => &COLUMN_ORDERING,
            ItemKind::Card => &CARD_ORDERING,
            ItemKind::Task => &TASK_ORDERING,
        }
    }

    /// Lowercase name, as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Column => "column",
            ItemKind::Card => "card",
            ItemKind::Task => "task",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parent scope kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// A board owning ordered columns.
    Board,
    /// A column owning ordered cards.
    Column,
    /// A card owning ordered tasks.
    Card,
}

impl ScopeKind {
    /// The kind of item this scope owns.
    pub fn child_kind(&self) -> ItemKind {
        match self {
            ScopeKind::Board => ItemKind::Column,
            ScopeKind::Column => ItemKind::Card,
            ScopeKind::Card => ItemKind::Task,
        }
    }

    /// Lowercase name, as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Board => "board",
            ScopeKind::Column => "column",
            ScopeKind::Card => "card",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether repositioning an item may also change its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossScope {
    /// Position writes for the item also set its parent foreign key, and the
    /// item may move between scopes of the same board.
    Allowed,
    /// The item is repositioned within its current parent only.
    Forbidden,
}

/// Capability description for one orderable kind.
///
/// The repositioning algorithm, the store and the patch applier are all
/// parameterized by this description instead of hard-coding per-kind logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingProfile {
    /// The kind being ordered.
    pub kind: ItemKind,
    /// The kind of parent that owns the scope.
    pub parent_kind: ScopeKind,
    /// Storage table holding rows of this kind.
    pub table: &'static str,
    /// Foreign-key column referencing the parent scope.
    pub parent_fk: &'static str,
    /// Whether a move may change the parent reference.
    pub cross_scope: CrossScope,
}

/// Columns order within their board and never leave it.
pub const COLUMN_ORDERING: OrderingProfile = OrderingProfile {
    kind: ItemKind::Column,
    parent_kind: ScopeKind::Board,
    table: "columns",
    parent_fk: "board_id",
    cross_scope: CrossScope::Forbidden,
};

/// Cards order within a column and may move between columns of one board.
pub const CARD_ORDERING: OrderingProfile = OrderingProfile {
    kind: ItemKind::Card,
    parent_kind: ScopeKind::Column,
    table: "cards",
    parent_fk: "column_id",
    cross_scope: CrossScope::Allowed,
};

/// Tasks order within a card and may move between cards of one board.
pub const TASK_ORDERING: OrderingProfile = OrderingProfile {
    kind: ItemKind::Task,
    parent_kind: ScopeKind::Card,
    table: "tasks",
    parent_fk: "card_id",
    cross_scope: CrossScope::Allowed,
};
