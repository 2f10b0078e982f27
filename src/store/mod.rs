//! store
//!
//! Single doorway to persistent board state.
//!
//! # Architecture
//!
//! All reads and writes of ordered collections flow through the two traits in
//! this module. No other module issues SQL or touches row state directly.
//! This keeps the repositioning algorithm testable against an in-memory fake
//! and makes the transactional discipline auditable in one place.
//!
//! - [`ScopeStore`] is the view the engine works against *inside* a
//!   transaction: ordered sibling reads, targeted position writes, and the
//!   supporting lookups used for validation.
//! - [`Transactional`] is the boundary that produces such a view. Work runs
//!   against the view and the boundary commits on success or rolls back on
//!   any error, re-surfacing the original error. Components that already
//!   hold a view (the patch applier invoking the repositioning algorithm)
//!   call the `*_in` engine entry points directly, so composition never
//!   double-wraps a transaction.
//!
//! # Implementations
//!
//! - [`sqlite::SqliteStore`] - rusqlite-backed store, one table per kind
//! - [`memory::MemStore`] - in-memory fake with snapshot rollback

pub mod memory;
pub mod sqlite;

pub use memory::MemStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::model::{Item, ItemRef, ScopeRef};
use crate::core::types::{BoardId, Position};

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Filesystem failure while opening the database.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A referenced row does not exist.
    #[error("no such {kind}: {id}")]
    NotFound { kind: &'static str, id: i64 },

    /// Injected write fault (test support).
    #[error("injected storage fault: {0}")]
    Fault(&'static str),
}

/// One sibling row of a scope: raw id plus current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingRow {
    pub id: i64,
    pub position: Position,
}

/// A single position write produced by the repositioning planner.
///
/// `new_parent` is set only for the moved item and only when its ordering
/// profile allows cross-scope moves; sibling writes never carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionWrite {
    pub item: ItemRef,
    pub position: Position,
    pub new_parent: Option<ScopeRef>,
}

/// Fields for a new column; position is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewColumn {
    pub title: String,
    pub wip_limit: Option<i64>,
}

/// Fields for a new card; position is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub estimate: f64,
}

/// Fields for a new task; position is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
}

/// Transaction-scoped access to ordered collections.
///
/// Methods take `&self`: the SQLite view wraps a borrowed connection and the
/// memory fake uses interior mutability, so a view can be handed around as a
/// plain shared reference for the duration of the transaction.
pub trait ScopeStore {
    /// Load an item with its current parent and position, if it exists.
    fn load_item(&self, item: ItemRef) -> Result<Option<Item>, StoreError>;

    /// Whether the referenced scope row exists.
    fn scope_exists(&self, scope: ScopeRef) -> Result<bool, StoreError>;

    /// The board at the root of the scope's aggregate, if the scope exists.
    fn root_board(&self, scope: ScopeRef) -> Result<Option<BoardId>, StoreError>;

    /// All children of `scope` ordered by position ascending (id ascending on
    /// ties), optionally excluding one item.
    fn siblings_of(
        &self,
        scope: ScopeRef,
        excluding: Option<ItemRef>,
    ) -> Result<Vec<SiblingRow>, StoreError>;

    /// Apply one position write. Sets the parent foreign key as well when the
    /// write carries `new_parent`.
    fn write_position(&self, write: &PositionWrite) -> Result<(), StoreError>;

    /// Persist the non-positional fields of an item. Position and parent are
    /// deliberately not written here; those change only through
    /// [`ScopeStore::write_position`].
    fn write_fields(&self, item: &Item) -> Result<(), StoreError>;
}

/// The transactional boundary around engine work.
pub trait Transactional {
    /// Run `work` against a transaction-scoped view. Commits when `work`
    /// returns `Ok`, rolls back when it returns `Err`, and re-surfaces the
    /// original error either way.
    fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&dyn ScopeStore) -> Result<T, E>;
}
