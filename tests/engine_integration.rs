//! End-to-end engine tests against the SQLite store.
//!
//! These exercise the same flows the CLI drives: create a board tree in a
//! real database file, reposition items, apply patches, and check the
//! orderings that come back.

use tempfile::TempDir;

use corkboard::core::model::{Item, ItemRef, ScopeRef};
use corkboard::core::types::{CardId, Rank};
use corkboard::engine::{self, EngineError, PatchOp, PatchSet};
use corkboard::store::{NewCard, NewColumn, NewTask, SqliteStore, StoreError};

struct BoardFixture {
    _dir: TempDir,
    store: SqliteStore,
    board: corkboard::core::types::BoardId,
    column: corkboard::core::types::ColumnId,
    cards: Vec<CardId>,
}

/// One board, one column, four cards A-D at positions 1..=4, on disk.
fn fixture() -> BoardFixture {
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(dir.path().join("boards.db")).unwrap();
    let board = store.create_board("sprint", false).unwrap();
    let column = store
        .create_column(
            board.id,
            NewColumn {
                title: "todo".into(),
                wip_limit: None,
            },
        )
        .unwrap();
    let cards = ["a", "b", "c", "d"]
        .iter()
        .map(|title| {
            store
                .create_card(
                    column.id,
                    NewCard {
                        title: title.to_string(),
                        ..NewCard::default()
                    },
                )
                .unwrap()
                .id
        })
        .collect();
    BoardFixture {
        _dir: dir,
        store,
        board: board.id,
        column: column.id,
        cards,
    }
}

fn order(store: &SqliteStore, column: corkboard::core::types::ColumnId) -> Vec<CardId> {
    store
        .cards_of(column)
        .unwrap()
        .iter()
        .map(|card| card.id)
        .collect()
}

fn positions(store: &SqliteStore, column: corkboard::core::types::ColumnId) -> Vec<i64> {
    store
        .cards_of(column)
        .unwrap()
        .iter()
        .map(|card| card.position)
        .collect()
}

#[test]
fn worked_example_from_the_contract() {
    let mut fx = fixture();
    let (board, column) = (fx.board, fx.column);
    let [a, b, c, d] = fx.cards[..] else { unreachable!() };
    let store = &mut fx.store;

    // [A,B,C,D] -> move C to rank 2 -> [A,C,B,D] with positions 1..=4.
    engine::move_item(
        store,
        ItemRef::Card(c),
        ScopeRef::Column(column),
        Rank::clamped(2),
    )
    .unwrap();
    assert_eq!(order(store, column), vec![a, c, b, d]);
    assert_eq!(positions(store, column), vec![1, 2, 3, 4]);

    // -> move C to rank 1 -> [C,A,B,D].
    engine::move_item(
        store,
        ItemRef::Card(c),
        ScopeRef::Column(column),
        Rank::clamped(1),
    )
    .unwrap();
    assert_eq!(order(store, column), vec![c, a, b, d]);

    // Move C into an empty sibling column at rank 1.
    let empty = store
        .create_column(
            board,
            NewColumn {
                title: "doing".into(),
                wip_limit: None,
            },
        )
        .unwrap();
    engine::move_item(
        store,
        ItemRef::Card(c),
        ScopeRef::Column(empty.id),
        Rank::clamped(1),
    )
    .unwrap();
    assert_eq!(order(store, column), vec![a, b, d]);
    assert_eq!(positions(store, column), vec![1, 2, 3]);
    assert_eq!(order(store, empty.id), vec![c]);
    assert_eq!(positions(store, empty.id), vec![1]);
}

#[test]
fn delete_gap_is_repaired_by_the_next_move() {
    let mut fx = fixture();
    let column = fx.column;
    let [a, b, c, d] = fx.cards[..] else { unreachable!() };
    let store = &mut fx.store;

    store.delete_item(ItemRef::Card(b)).unwrap();
    assert_eq!(positions(store, column), vec![1, 3, 4]);

    engine::move_item(
        store,
        ItemRef::Card(d),
        ScopeRef::Column(column),
        Rank::clamped(1),
    )
    .unwrap();
    assert_eq!(order(store, column), vec![d, a, c]);
    assert_eq!(positions(store, column), vec![1, 2, 3]);
}

#[test]
fn column_reorder_within_a_board() {
    let mut fx = fixture();
    let board = fx.board;
    let store = &mut fx.store;
    let second = store
        .create_column(
            board,
            NewColumn {
                title: "doing".into(),
                wip_limit: Some(2),
            },
        )
        .unwrap();

    engine::move_item(
        store,
        ItemRef::Column(second.id),
        ScopeRef::Board(board),
        Rank::clamped(1),
    )
    .unwrap();

    let columns = store.columns_of(board).unwrap();
    assert_eq!(columns[0].id, second.id);
    assert_eq!(
        columns.iter().map(|c| c.position).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn task_moves_between_cards() {
    let mut fx = fixture();
    let cards = fx.cards.clone();
    let store = &mut fx.store;
    let task = store
        .create_task(cards[0], NewTask { title: "t1".into() })
        .unwrap();
    store
        .create_task(cards[0], NewTask { title: "t2".into() })
        .unwrap();

    engine::move_item(
        store,
        ItemRef::Task(task.id),
        ScopeRef::Card(cards[1]),
        Rank::clamped(1),
    )
    .unwrap();

    let source: Vec<i64> = store
        .tasks_of(cards[0])
        .unwrap()
        .iter()
        .map(|t| t.position)
        .collect();
    assert_eq!(source, vec![1]);
    assert_eq!(store.tasks_of(cards[1]).unwrap()[0].id, task.id);
}

#[test]
fn patch_renames_and_repositions_atomically() {
    let mut fx = fixture();
    let (board, column) = (fx.board, fx.column);
    let cards = fx.cards.clone();
    let store = &mut fx.store;
    let target = store
        .create_column(
            board,
            NewColumn {
                title: "doing".into(),
                wip_limit: None,
            },
        )
        .unwrap();

    let patch = PatchSet::new(vec![
        PatchOp::Replace {
            path: "/title".into(),
            value: serde_json::json!("a, relocated"),
        },
        PatchOp::Replace {
            path: "/columnId".into(),
            value: serde_json::json!(target.id.get()),
        },
        PatchOp::Replace {
            path: "/position".into(),
            value: serde_json::json!(1),
        },
    ]);
    engine::apply_patch(store, ItemRef::Card(cards[0]), &patch).unwrap();

    let moved = &store.cards_of(target.id).unwrap()[0];
    assert_eq!(moved.id, cards[0]);
    assert_eq!(moved.title, "a, relocated");
    assert_eq!(positions(store, column), vec![1, 2, 3]);
}

#[test]
fn failed_patch_rolls_back_all_field_changes() {
    let mut fx = fixture();
    let cards = fx.cards.clone();
    let store = &mut fx.store;
    let foreign_board = store.create_board("other", false).unwrap();
    let foreign = store
        .create_column(
            foreign_board.id,
            NewColumn {
                title: "elsewhere".into(),
                wip_limit: None,
            },
        )
        .unwrap();

    let patch = PatchSet::new(vec![
        PatchOp::Replace {
            path: "/title".into(),
            value: serde_json::json!("should not stick"),
        },
        PatchOp::Replace {
            path: "/columnId".into(),
            value: serde_json::json!(foreign.id.get()),
        },
    ]);
    let err = engine::apply_patch(store, ItemRef::Card(cards[0]), &patch).unwrap_err();
    assert!(matches!(err, EngineError::CrossBoard { .. }));
    assert!(err.to_string().contains("across different boards"));

    let Some(Item::Card(card)) = store.item(ItemRef::Card(cards[0])).ok().flatten() else {
        panic!("card vanished");
    };
    assert_eq!(card.title, "a");
    assert!(store.cards_of(foreign.id).unwrap().is_empty());
}

#[test]
fn validation_errors_use_stable_messages() {
    let mut fx = fixture();
    let column = fx.column;
    let store = &mut fx.store;

    let invalid_item = engine::move_item(
        store,
        ItemRef::Card(CardId::new(404)),
        ScopeRef::Column(column),
        Rank::clamped(1),
    )
    .unwrap_err();
    assert_eq!(invalid_item.to_string(), "invalid item for reordering");

    let invalid_parent = engine::move_item(
        store,
        ItemRef::Card(CardId::new(1)),
        ScopeRef::Column(corkboard::core::types::ColumnId::new(404)),
        Rank::clamped(1),
    )
    .unwrap_err();
    assert_eq!(invalid_parent.to_string(), "invalid parent for reordering");

    let not_numeric = engine::apply_patch(
        store,
        ItemRef::Card(CardId::new(1)),
        &PatchSet::new(vec![PatchOp::Replace {
            path: "/position".into(),
            value: serde_json::json!("soon"),
        }]),
    )
    .unwrap_err();
    assert_eq!(not_numeric.to_string(), "position must be numeric");
}

#[test]
fn store_errors_surface_through_the_engine() {
    let mut fx = fixture();
    let missing = fx.store.delete_item(ItemRef::Card(CardId::new(404)));
    assert!(matches!(
        missing,
        Err(StoreError::NotFound { kind: "card", id: 404 })
    ));
}
