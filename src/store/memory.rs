//! store::memory
//!
//! In-memory board store.
//!
//! The fake mirrors the SQLite store's semantics closely enough for the
//! engine to be exercised without any I/O: creates append at the end of the
//! scope, deletes leave gaps, and the transactional boundary restores a
//! snapshot of the whole state when work fails.
//!
//! With `cfg(test)` (or the `fault_injection` feature) the store can be armed
//! to fail after a fixed number of position writes, which is how the
//! cross-scope atomicity properties are tested.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use chrono::Utc;

use crate::core::model::{Board, Card, Column, Item, ItemRef, ScopeRef, Task};
use crate::core::types::{BoardId, CardId, ColumnId, TaskId};

use super::{
    NewCard, NewColumn, NewTask, PositionWrite, ScopeStore, SiblingRow, StoreError, Transactional,
};

#[derive(Debug, Default, Clone)]
struct MemState {
    boards: BTreeMap<i64, Board>,
    columns: BTreeMap<i64, Column>,
    cards: BTreeMap<i64, Card>,
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

impl MemState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store with snapshot-rollback transactions.
#[derive(Debug, Default)]
pub struct MemStore {
    state: RefCell<MemState>,
    write_fault: Cell<Option<usize>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the store to fail position writes once `budget` writes have been
    /// performed. Test support for atomicity properties.
    #[cfg(any(test, feature = "fault_injection"))]
    pub fn inject_write_fault(&self, budget: usize) {
        self.write_fault.set(Some(budget));
    }

    /// Create a board.
    pub fn create_board(&mut self, name: &str, private: bool) -> Result<Board, StoreError> {
        let now = Utc::now();
        let mut state = self.state.borrow_mut();
        let id = BoardId::new(state.allocate_id());
        let board = Board {
            id,
            name: name.to_string(),
            private,
            created_at: now,
            updated_at: now,
        };
        state.boards.insert(id.get(), board.clone());
        Ok(board)
    }

    /// Create a column appended at the end of its board.
    pub fn create_column(&mut self, board: BoardId, new: NewColumn) -> Result<Column, StoreError> {
        let now = Utc::now();
        let mut state = self.state.borrow_mut();
        if !state.boards.contains_key(&board.get()) {
            return Err(StoreError::NotFound {
                kind: "board",
                id: board.get(),
            });
        }
        let position = state
            .columns
            .values()
            .filter(|column| column.board_id == board)
            .map(|column| column.position)
            .max()
            .unwrap_or(0)
            + 1;
        let id = ColumnId::new(state.allocate_id());
        let column = Column {
            id,
            board_id: board,
            position,
            title: new.title,
            wip_limit: new.wip_limit,
            created_at: now,
            updated_at: now,
        };
        state.columns.insert(id.get(), column.clone());
        Ok(column)
    }

    /// Create a card appended at the end of its column.
    pub fn create_card(&mut self, column: ColumnId, new: NewCard) -> Result<Card, StoreError> {
        let now = Utc::now();
        let mut state = self.state.borrow_mut();
        if !state.columns.contains_key(&column.get()) {
            return Err(StoreError::NotFound {
                kind: "column",
                id: column.get(),
            });
        }
        let position = state
            .cards
            .values()
            .filter(|card| card.column_id == column)
            .map(|card| card.position)
            .max()
            .unwrap_or(0)
            + 1;
        let id = CardId::new(state.allocate_id());
        let card = Card {
            id,
            column_id: column,
            position,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            estimate: new.estimate,
            created_at: now,
            updated_at: now,
        };
        state.cards.insert(id.get(), card.clone());
        Ok(card)
    }

    /// Create a task appended at the end of its card.
    pub fn create_task(&mut self, card: CardId, new: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let mut state = self.state.borrow_mut();
        if !state.cards.contains_key(&card.get()) {
            return Err(StoreError::NotFound {
                kind: "card",
                id: card.get(),
            });
        }
        let position = state
            .tasks
            .values()
            .filter(|task| task.card_id == card)
            .map(|task| task.position)
            .max()
            .unwrap_or(0)
            + 1;
        let id = TaskId::new(state.allocate_id());
        let task = Task {
            id,
            card_id: card,
            position,
            title: new.title,
            done: false,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(id.get(), task.clone());
        Ok(task)
    }

    /// Delete an item without renumbering survivors.
    pub fn delete_item(&mut self, item: ItemRef) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        let removed = match item {
            ItemRef::Column(id) => state.columns.remove(&id.get()).is_some(),
            ItemRef::Card(id) => state.cards.remove(&id.get()).is_some(),
            ItemRef::Task(id) => state.tasks.remove(&id.get()).is_some(),
        };
        if !removed {
            return Err(StoreError::NotFound {
                kind: item.kind().as_str(),
                id: item.raw_id(),
            });
        }
        Ok(())
    }

    /// Columns of a board, ordered by position.
    pub fn columns_of(&self, board: BoardId) -> Vec<Column> {
        let state = self.state.borrow();
        let mut columns: Vec<_> = state
            .columns
            .values()
            .filter(|column| column.board_id == board)
            .cloned()
            .collect();
        columns.sort_by_key(|column| (column.position, column.id.get()));
        columns
    }

    /// Cards of a column, ordered by position.
    pub fn cards_of(&self, column: ColumnId) -> Vec<Card> {
        let state = self.state.borrow();
        let mut cards: Vec<_> = state
            .cards
            .values()
            .filter(|card| card.column_id == column)
            .cloned()
            .collect();
        cards.sort_by_key(|card| (card.position, card.id.get()));
        cards
    }

    /// Tasks of a card, ordered by position.
    pub fn tasks_of(&self, card: CardId) -> Vec<Task> {
        let state = self.state.borrow();
        let mut tasks: Vec<_> = state
            .tasks
            .values()
            .filter(|task| task.card_id == card)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.position, task.id.get()));
        tasks
    }

    /// Load an item outside a transaction.
    pub fn item(&self, item: ItemRef) -> Option<Item> {
        let state = self.state.borrow();
        load_from(&state, item)
    }
}

impl Transactional for MemStore {
    fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&dyn ScopeStore) -> Result<T, E>,
    {
        let checkpoint = self.state.borrow().clone();
        let view = MemView { store: self };
        match work(&view) {
            Ok(value) => Ok(value),
            Err(err) => {
                *self.state.borrow_mut() = checkpoint;
                Err(err)
            }
        }
    }
}

struct MemView<'a> {
    store: &'a MemStore,
}

impl MemView<'_> {
    fn consume_write_budget(&self) -> Result<(), StoreError> {
        if let Some(budget) = self.store.write_fault.get() {
            if budget == 0 {
                return Err(StoreError::Fault("write budget exhausted"));
            }
            self.store.write_fault.set(Some(budget - 1));
        }
        Ok(())
    }
}

impl ScopeStore for MemView<'_> {
    fn load_item(&self, item: ItemRef) -> Result<Option<Item>, StoreError> {
        let state = self.store.state.borrow();
        Ok(load_from(&state, item))
    }

    fn scope_exists(&self, scope: ScopeRef) -> Result<bool, StoreError> {
        let state = self.store.state.borrow();
        let exists = match scope {
            ScopeRef::Board(id) => state.boards.contains_key(&id.get()),
            ScopeRef::Column(id) => state.columns.contains_key(&id.get()),
            ScopeRef::Card(id) => state.cards.contains_key(&id.get()),
        };
        Ok(exists)
    }

    fn root_board(&self, scope: ScopeRef) -> Result<Option<BoardId>, StoreError> {
        let state = self.store.state.borrow();
        let board = match scope {
            ScopeRef::Board(id) => state.boards.get(&id.get()).map(|board| board.id),
            ScopeRef::Column(id) => state.columns.get(&id.get()).map(|column| column.board_id),
            ScopeRef::Card(id) => state
                .cards
                .get(&id.get())
                .and_then(|card| state.columns.get(&card.column_id.get()))
                .map(|column| column.board_id),
        };
        Ok(board)
    }

    fn siblings_of(
        &self,
        scope: ScopeRef,
        excluding: Option<ItemRef>,
    ) -> Result<Vec<SiblingRow>, StoreError> {
        let state = self.store.state.borrow();
        let excluded = excluding.map(|item| item.raw_id());
        let mut rows: Vec<SiblingRow> = match scope {
            ScopeRef::Board(id) => state
                .columns
                .values()
                .filter(|column| column.board_id == id)
                .map(|column| SiblingRow {
                    id: column.id.get(),
                    position: column.position,
                })
                .collect(),
            ScopeRef::Column(id) => state
                .cards
                .values()
                .filter(|card| card.column_id == id)
                .map(|card| SiblingRow {
                    id: card.id.get(),
                    position: card.position,
                })
                .collect(),
            ScopeRef::Card(id) => state
                .tasks
                .values()
                .filter(|task| task.card_id == id)
                .map(|task| SiblingRow {
                    id: task.id.get(),
                    position: task.position,
                })
                .collect(),
        };
        if let Some(excluded) = excluded {
            rows.retain(|row| row.id != excluded);
        }
        rows.sort_by_key(|row| (row.position, row.id));
        Ok(rows)
    }

    fn write_position(&self, write: &PositionWrite) -> Result<(), StoreError> {
        self.consume_write_budget()?;
        let now = Utc::now();
        let mut state = self.store.state.borrow_mut();
        let found = match write.item {
            ItemRef::Column(id) => state.columns.get_mut(&id.get()).map(|column| {
                column.position = write.position;
                if let Some(ScopeRef::Board(board)) = write.new_parent {
                    column.board_id = board;
                }
                column.updated_at = now;
            }),
            ItemRef::Card(id) => state.cards.get_mut(&id.get()).map(|card| {
                card.position = write.position;
                if let Some(ScopeRef::Column(column)) = write.new_parent {
                    card.column_id = column;
                }
                card.updated_at = now;
            }),
            ItemRef::Task(id) => state.tasks.get_mut(&id.get()).map(|task| {
                task.position = write.position;
                if let Some(ScopeRef::Card(card)) = write.new_parent {
                    task.card_id = card;
                }
                task.updated_at = now;
            }),
        };
        found.ok_or(StoreError::NotFound {
            kind: write.item.kind().as_str(),
            id: write.item.raw_id(),
        })
    }

    fn write_fields(&self, item: &Item) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut state = self.store.state.borrow_mut();
        let found = match item {
            Item::Column(column) => state.columns.get_mut(&column.id.get()).map(|stored| {
                stored.title = column.title.clone();
                stored.wip_limit = column.wip_limit;
                stored.updated_at = now;
            }),
            Item::Card(card) => state.cards.get_mut(&card.id.get()).map(|stored| {
                stored.title = card.title.clone();
                stored.description = card.description.clone();
                stored.due_date = card.due_date;
                stored.estimate = card.estimate;
                stored.updated_at = now;
            }),
            Item::Task(task) => state.tasks.get_mut(&task.id.get()).map(|stored| {
                stored.title = task.title.clone();
                stored.done = task.done;
                stored.updated_at = now;
            }),
        };
        found.ok_or(StoreError::NotFound {
            kind: item.kind().as_str(),
            id: item.item_ref().raw_id(),
        })
    }
}

fn load_from(state: &MemState, item: ItemRef) -> Option<Item> {
    match item {
        ItemRef::Column(id) => state.columns.get(&id.get()).cloned().map(Item::Column),
        ItemRef::Card(id) => state.cards.get(&id.get()).cloned().map(Item::Card),
        ItemRef::Task(id) => state.tasks.get(&id.get()).cloned().map(Item::Task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_append_at_end_of_scope() {
        let mut store = MemStore::new();
        let board = store.create_board("b", false).unwrap();
        let col = store.create_column(board.id, NewColumn::default()).unwrap();
        let a = store.create_card(col.id, NewCard::default()).unwrap();
        let b = store.create_card(col.id, NewCard::default()).unwrap();
        assert_eq!(a.position, 1);
        assert_eq!(b.position, 2);
    }

    #[test]
    fn failed_transaction_restores_snapshot() {
        let mut store = MemStore::new();
        let board = store.create_board("b", false).unwrap();
        let col = store.create_column(board.id, NewColumn::default()).unwrap();
        let card = store.create_card(col.id, NewCard::default()).unwrap();

        let result: Result<(), StoreError> = store.with_transaction(|view| {
            view.write_position(&PositionWrite {
                item: ItemRef::Card(card.id),
                position: 9,
                new_parent: None,
            })?;
            Err(StoreError::Fault("boom"))
        });
        assert!(result.is_err());
        assert_eq!(store.cards_of(col.id)[0].position, 1);
    }

    #[test]
    fn write_fault_fires_after_budget() {
        let mut store = MemStore::new();
        let board = store.create_board("b", false).unwrap();
        let col = store.create_column(board.id, NewColumn::default()).unwrap();
        let card = store.create_card(col.id, NewCard::default()).unwrap();
        store.inject_write_fault(1);

        let result: Result<(), StoreError> = store.with_transaction(|view| {
            let write = PositionWrite {
                item: ItemRef::Card(card.id),
                position: 1,
                new_parent: None,
            };
            view.write_position(&write)?; // consumes the budget
            view.write_position(&write) // fails
        });
        assert!(matches!(result, Err(StoreError::Fault(_))));
    }

    #[test]
    fn delete_leaves_gap() {
        let mut store = MemStore::new();
        let board = store.create_board("b", false).unwrap();
        let col = store.create_column(board.id, NewColumn::default()).unwrap();
        store.create_card(col.id, NewCard::default()).unwrap();
        let middle = store.create_card(col.id, NewCard::default()).unwrap();
        store.create_card(col.id, NewCard::default()).unwrap();

        store.delete_item(ItemRef::Card(middle.id)).unwrap();
        let positions: Vec<_> = store
            .cards_of(col.id)
            .iter()
            .map(|card| card.position)
            .collect();
        assert_eq!(positions, vec![1, 3]);
    }
}
