//! Property-based tests for the repositioning engine.
//!
//! These tests use proptest to verify the ordering invariants hold across
//! randomly generated move sequences, against a plain `Vec` model of the
//! intended semantics.

use proptest::prelude::*;

use corkboard::core::model::{ItemRef, ScopeRef};
use corkboard::core::types::{CardId, ColumnId, Rank};
use corkboard::engine::move_item;
use corkboard::store::{MemStore, NewCard, NewColumn};

/// A single move instruction: which card (by index into the initial set),
/// which column (by index), and the requested rank.
#[derive(Debug, Clone, Copy)]
struct MoveOp {
    card: usize,
    column: usize,
    rank: i64,
}

fn move_ops(cards: usize, columns: usize) -> impl Strategy<Value = Vec<MoveOp>> {
    prop::collection::vec(
        (0..cards, 0..columns, -2i64..(cards as i64 + 3)).prop_map(|(card, column, rank)| {
            MoveOp { card, column, rank }
        }),
        1..24,
    )
}

/// Model of one scope: ordered card indices.
fn model_apply(scopes: &mut [Vec<usize>], op: MoveOp) {
    // Remove the card from whichever scope holds it.
    for scope in scopes.iter_mut() {
        if let Some(at) = scope.iter().position(|&card| card == op.card) {
            scope.remove(at);
            break;
        }
    }
    // Clamp to [1, N+1] and insert.
    let target = &mut scopes[op.column];
    let index = ((op.rank.max(1) - 1) as usize).min(target.len());
    target.insert(index, op.card);
}

fn build_store(cards: usize, columns: usize) -> (MemStore, Vec<ColumnId>, Vec<CardId>) {
    let mut store = MemStore::new();
    let board = store.create_board("prop", false).unwrap();
    let column_ids: Vec<ColumnId> = (0..columns)
        .map(|index| {
            store
                .create_column(
                    board.id,
                    NewColumn {
                        title: format!("col-{index}"),
                        wip_limit: None,
                    },
                )
                .unwrap()
                .id
        })
        .collect();
    // All cards start in the first column, positions 1..=cards.
    let card_ids: Vec<CardId> = (0..cards)
        .map(|index| {
            store
                .create_card(
                    column_ids[0],
                    NewCard {
                        title: format!("card-{index}"),
                        ..NewCard::default()
                    },
                )
                .unwrap()
                .id
        })
        .collect();
    (store, column_ids, card_ids)
}

proptest! {
    /// After any sequence of same-scope moves, positions are exactly 1..=N
    /// and the order matches the model.
    #[test]
    fn single_scope_moves_preserve_contiguity_and_order(
        cards in 1usize..8,
        raw_ops in prop::collection::vec((0usize..8, -2i64..11), 1..24),
    ) {
        let (mut store, columns, card_ids) = build_store(cards, 1);
        let mut model: Vec<Vec<usize>> = vec![(0..cards).collect()];

        for (card, rank) in raw_ops {
            let op = MoveOp { card: card % cards, column: 0, rank };
            move_item(
                &mut store,
                ItemRef::Card(card_ids[op.card]),
                ScopeRef::Column(columns[0]),
                Rank::clamped(op.rank),
            ).unwrap();
            model_apply(&mut model, op);

            let stored = store.cards_of(columns[0]);
            let positions: Vec<i64> = stored.iter().map(|card| card.position).collect();
            prop_assert_eq!(positions, (1..=cards as i64).collect::<Vec<_>>());
            let order: Vec<CardId> = stored.iter().map(|card| card.id).collect();
            let expected: Vec<CardId> =
                model[0].iter().map(|&index| card_ids[index]).collect();
            prop_assert_eq!(order, expected);
        }
    }

    /// Cross-scope sequences keep every column contiguous and matching the
    /// model, with no card duplicated or lost.
    #[test]
    fn cross_scope_moves_preserve_both_scopes(
        ops in move_ops(6, 3),
    ) {
        let cards = 6;
        let (mut store, columns, card_ids) = build_store(cards, 3);
        let mut model: Vec<Vec<usize>> = vec![(0..cards).collect(), Vec::new(), Vec::new()];

        for op in ops {
            move_item(
                &mut store,
                ItemRef::Card(card_ids[op.card]),
                ScopeRef::Column(columns[op.column]),
                Rank::clamped(op.rank),
            ).unwrap();
            model_apply(&mut model, op);

            let mut seen = 0usize;
            for (scope, column) in model.iter().zip(&columns) {
                let stored = store.cards_of(*column);
                let positions: Vec<i64> = stored.iter().map(|card| card.position).collect();
                prop_assert_eq!(positions, (1..=scope.len() as i64).collect::<Vec<_>>());
                let order: Vec<CardId> = stored.iter().map(|card| card.id).collect();
                let expected: Vec<CardId> =
                    scope.iter().map(|&index| card_ids[index]).collect();
                prop_assert_eq!(order, expected);
                seen += stored.len();
            }
            prop_assert_eq!(seen, cards);
        }
    }

    /// Moving an item to its current rank never changes the ordering.
    #[test]
    fn noop_moves_are_stable(cards in 1usize..8, pick in 0usize..8) {
        let (mut store, columns, card_ids) = build_store(cards, 1);
        let pick = pick % cards;
        let before: Vec<CardId> =
            store.cards_of(columns[0]).iter().map(|card| card.id).collect();
        let current_rank = pick as i64 + 1;

        move_item(
            &mut store,
            ItemRef::Card(card_ids[pick]),
            ScopeRef::Column(columns[0]),
            Rank::clamped(current_rank),
        ).unwrap();

        let after: Vec<CardId> =
            store.cards_of(columns[0]).iter().map(|card| card.id).collect();
        prop_assert_eq!(before, after);
    }
}
