//! store::sqlite
//!
//! SQLite-backed board store.
//!
//! # Schema
//!
//! One table per orderable kind plus the `boards` root table. Every orderable
//! row carries its parent foreign key and an integer `position`; the engine
//! issues ordered range reads scoped by the foreign key and targeted updates
//! to `position` (and, for cross-scope moves, the foreign key).
//!
//! # Concurrency
//!
//! The ordered sibling set of a scope is a critical section for the duration
//! of a repositioning call: the engine reads the full ordering and writes
//! back derived positions. Every mutating transaction is opened with
//! `BEGIN IMMEDIATE`, so the write lock is held from the first read to the
//! commit and a concurrent writer waits (up to the busy timeout) instead of
//! observing a stale ordering.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::core::model::{Board, Card, Column, Item, ItemRef, ScopeRef, Task};
use crate::core::profile::ScopeKind;
use crate::core::types::{BoardId, CardId, ColumnId, TaskId};

use super::{
    NewCard, NewColumn, NewTask, PositionWrite, ScopeStore, SiblingRow, StoreError, Transactional,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS boards (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    private    INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS columns (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id   INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    position   INTEGER NOT NULL DEFAULT 1,
    title      TEXT NOT NULL,
    wip_limit  INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_columns_board ON columns(board_id, position);

CREATE TABLE IF NOT EXISTS cards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    column_id   INTEGER NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL DEFAULT 1,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    due_date    TEXT,
    estimate    REAL NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cards_column ON cards(column_id, position);

CREATE TABLE IF NOT EXISTS tasks (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    card_id    INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
    position   INTEGER NOT NULL DEFAULT 1,
    title      TEXT NOT NULL,
    done       INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_card ON tasks(card_id, position);
"#;

/// SQLite-backed store. The only handle to a board database.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and if necessary create) a board database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Create a board.
    pub fn create_board(&mut self, name: &str, private: bool) -> Result<Board, StoreError> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO boards(name, private, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, private, now, now],
        )?;
        let id = BoardId::new(self.conn.last_insert_rowid());
        Ok(Board {
            id,
            name: name.to_string(),
            private,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a column appended at the end of its board.
    pub fn create_column(
        &mut self,
        board: BoardId,
        new: NewColumn,
    ) -> Result<Column, StoreError> {
        let now = Utc::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_row(&tx, "boards", "board", board.get())?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM columns WHERE board_id = ?1",
            params![board.get()],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO columns(board_id, position, title, wip_limit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![board.get(), position, new.title, new.wip_limit, now, now],
        )?;
        let id = ColumnId::new(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Column {
            id,
            board_id: board,
            position,
            title: new.title,
            wip_limit: new.wip_limit,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a card appended at the end of its column.
    pub fn create_card(&mut self, column: ColumnId, new: NewCard) -> Result<Card, StoreError> {
        let now = Utc::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_row(&tx, "columns", "column", column.get())?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM cards WHERE column_id = ?1",
            params![column.get()],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO cards(column_id, position, title, description, due_date, estimate, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                column.get(),
                position,
                new.title,
                new.description,
                new.due_date,
                new.estimate,
                now,
                now
            ],
        )?;
        let id = CardId::new(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Card {
            id,
            column_id: column,
            position,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            estimate: new.estimate,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a task appended at the end of its card.
    pub fn create_task(&mut self, card: CardId, new: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_row(&tx, "cards", "card", card.get())?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM tasks WHERE card_id = ?1",
            params![card.get()],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO tasks(card_id, position, title, done, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![card.get(), position, new.title, now, now],
        )?;
        let id = TaskId::new(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Task {
            id,
            card_id: card,
            position,
            title: new.title,
            done: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Delete an item. Surviving siblings keep their positions; the gap is
    /// repaired by the next successful repositioning in that scope.
    pub fn delete_item(&mut self, item: ItemRef) -> Result<(), StoreError> {
        let profile = item.kind().profile();
        let affected = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", profile.table),
            params![item.raw_id()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: item.kind().as_str(),
                id: item.raw_id(),
            });
        }
        Ok(())
    }

    /// Load a board.
    pub fn board(&self, id: BoardId) -> Result<Option<Board>, StoreError> {
        let board = self
            .conn
            .query_row(
                "SELECT id, name, private, created_at, updated_at FROM boards WHERE id = ?1",
                params![id.get()],
                row_to_board,
            )
            .optional()?;
        Ok(board)
    }

    /// Columns of a board, ordered by position.
    pub fn columns_of(&self, board: BoardId) -> Result<Vec<Column>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, board_id, position, title, wip_limit, created_at, updated_at
             FROM columns WHERE board_id = ?1 ORDER BY position ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![board.get()], row_to_column)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Cards of a column, ordered by position.
    pub fn cards_of(&self, column: ColumnId) -> Result<Vec<Card>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, column_id, position, title, description, due_date, estimate, created_at, updated_at
             FROM cards WHERE column_id = ?1 ORDER BY position ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![column.get()], row_to_card)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Tasks of a card, ordered by position.
    pub fn tasks_of(&self, card: CardId) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, card_id, position, title, done, created_at, updated_at
             FROM tasks WHERE card_id = ?1 ORDER BY position ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![card.get()], row_to_task)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Load an item outside a transaction (read-only callers).
    pub fn item(&self, item: ItemRef) -> Result<Option<Item>, StoreError> {
        load_item(&self.conn, item)
    }
}

impl Transactional for SqliteStore {
    fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&dyn ScopeStore) -> Result<T, E>,
    {
        let tx = match self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
        {
            Ok(tx) => tx,
            Err(err) => return Err(E::from(StoreError::from(err))),
        };
        let outcome = {
            let view = SqliteView::new(&tx);
            work(&view)
        };
        match outcome {
            Ok(value) => match tx.commit() {
                Ok(()) => Ok(value),
                Err(err) => Err(E::from(StoreError::from(err))),
            },
            Err(err) => {
                // Rollback failures are subordinate to the original error.
                let _ = tx.rollback();
                Err(err)
            }
        }
    }
}

/// Transaction-scoped view over a borrowed connection.
struct SqliteView<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteView<'c> {
    fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl ScopeStore for SqliteView<'_> {
    fn load_item(&self, item: ItemRef) -> Result<Option<Item>, StoreError> {
        load_item(self.conn, item)
    }

    fn scope_exists(&self, scope: ScopeRef) -> Result<bool, StoreError> {
        let exists = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", scope_table(scope.kind())),
                params![scope.raw_id()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(exists.is_some())
    }

    fn root_board(&self, scope: ScopeRef) -> Result<Option<BoardId>, StoreError> {
        let board: Option<i64> = match scope {
            ScopeRef::Board(id) => self
                .conn
                .query_row(
                    "SELECT id FROM boards WHERE id = ?1",
                    params![id.get()],
                    |row| row.get(0),
                )
                .optional()?,
            ScopeRef::Column(id) => self
                .conn
                .query_row(
                    "SELECT board_id FROM columns WHERE id = ?1",
                    params![id.get()],
                    |row| row.get(0),
                )
                .optional()?,
            ScopeRef::Card(id) => self
                .conn
                .query_row(
                    "SELECT c.board_id FROM cards k JOIN columns c ON k.column_id = c.id
                     WHERE k.id = ?1",
                    params![id.get()],
                    |row| row.get(0),
                )
                .optional()?,
        };
        Ok(board.map(BoardId::new))
    }

    fn siblings_of(
        &self,
        scope: ScopeRef,
        excluding: Option<ItemRef>,
    ) -> Result<Vec<SiblingRow>, StoreError> {
        let child = scope.kind().child_kind().profile();
        let sql = match excluding {
            Some(_) => format!(
                "SELECT id, position FROM {} WHERE {} = ?1 AND id <> ?2
                 ORDER BY position ASC, id ASC",
                child.table, child.parent_fk
            ),
            None => format!(
                "SELECT id, position FROM {} WHERE {} = ?1 ORDER BY position ASC, id ASC",
                child.table, child.parent_fk
            ),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let map = |row: &rusqlite::Row<'_>| {
            Ok(SiblingRow {
                id: row.get(0)?,
                position: row.get(1)?,
            })
        };
        let rows = match excluding {
            Some(item) => stmt
                .query_map(params![scope.raw_id(), item.raw_id()], map)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map(params![scope.raw_id()], map)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }

    fn write_position(&self, write: &PositionWrite) -> Result<(), StoreError> {
        let profile = write.item.kind().profile();
        let now = Utc::now();
        let affected = match write.new_parent {
            Some(parent) => self.conn.execute(
                &format!(
                    "UPDATE {} SET position = ?1, {} = ?2, updated_at = ?3 WHERE id = ?4",
                    profile.table, profile.parent_fk
                ),
                params![write.position, parent.raw_id(), now, write.item.raw_id()],
            )?,
            None => self.conn.execute(
                &format!(
                    "UPDATE {} SET position = ?1, updated_at = ?2 WHERE id = ?3",
                    profile.table
                ),
                params![write.position, now, write.item.raw_id()],
            )?,
        };
        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: write.item.kind().as_str(),
                id: write.item.raw_id(),
            });
        }
        Ok(())
    }

    fn write_fields(&self, item: &Item) -> Result<(), StoreError> {
        let now = Utc::now();
        let affected = match item {
            Item::Column(column) => self.conn.execute(
                "UPDATE columns SET title = ?1, wip_limit = ?2, updated_at = ?3 WHERE id = ?4",
                params![column.title, column.wip_limit, now, column.id.get()],
            )?,
            Item::Card(card) => self.conn.execute(
                "UPDATE cards SET title = ?1, description = ?2, due_date = ?3, estimate = ?4,
                 updated_at = ?5 WHERE id = ?6",
                params![
                    card.title,
                    card.description,
                    card.due_date,
                    card.estimate,
                    now,
                    card.id.get()
                ],
            )?,
            Item::Task(task) => self.conn.execute(
                "UPDATE tasks SET title = ?1, done = ?2, updated_at = ?3 WHERE id = ?4",
                params![task.title, task.done, now, task.id.get()],
            )?,
        };
        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: item.kind().as_str(),
                id: item.item_ref().raw_id(),
            });
        }
        Ok(())
    }
}

fn scope_table(kind: ScopeKind) -> &'static str {
    match kind {
        ScopeKind::Board => "boards",
        ScopeKind::Column => "columns",
        ScopeKind::Card => "cards",
    }
}

fn require_row(
    conn: &Connection,
    table: &str,
    kind: &'static str,
    id: i64,
) -> Result<(), StoreError> {
    let exists = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1"),
            params![id],
            |_| Ok(()),
        )
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::NotFound { kind, id });
    }
    Ok(())
}

fn load_item(conn: &Connection, item: ItemRef) -> Result<Option<Item>, StoreError> {
    let loaded = match item {
        ItemRef::Column(id) => conn
            .query_row(
                "SELECT id, board_id, position, title, wip_limit, created_at, updated_at
                 FROM columns WHERE id = ?1",
                params![id.get()],
                row_to_column,
            )
            .optional()?
            .map(Item::Column),
        ItemRef::Card(id) => conn
            .query_row(
                "SELECT id, column_id, position, title, description, due_date, estimate, created_at, updated_at
                 FROM cards WHERE id = ?1",
                params![id.get()],
                row_to_card,
            )
            .optional()?
            .map(Item::Card),
        ItemRef::Task(id) => conn
            .query_row(
                "SELECT id, card_id, position, title, done, created_at, updated_at
                 FROM tasks WHERE id = ?1",
                params![id.get()],
                row_to_task,
            )
            .optional()?
            .map(Item::Task),
    };
    Ok(loaded)
}

fn row_to_board(row: &rusqlite::Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: BoardId::new(row.get(0)?),
        name: row.get(1)?,
        private: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn row_to_column(row: &rusqlite::Row<'_>) -> rusqlite::Result<Column> {
    Ok(Column {
        id: ColumnId::new(row.get(0)?),
        board_id: BoardId::new(row.get(1)?),
        position: row.get(2)?,
        title: row.get(3)?,
        wip_limit: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn row_to_card(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: CardId::new(row.get(0)?),
        column_id: ColumnId::new(row.get(1)?),
        position: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        due_date: row.get(5)?,
        estimate: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: TaskId::new(row.get(0)?),
        card_id: CardId::new(row.get(1)?),
        position: row.get(2)?,
        title: row.get(3)?,
        done: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
