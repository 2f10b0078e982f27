//! engine::plan
//!
//! Pure planning for repositioning operations.
//!
//! # Architecture
//!
//! The planner turns an ordered sibling list plus a target rank into the full
//! batch of position writes, without touching storage. The executor then
//! issues the batch inside a transaction. Keeping the walk synchronous and
//! in-memory makes the algorithm unit-testable without any I/O.
//!
//! # Algorithm
//!
//! Walk the ordered siblings with a running `next_position` starting at 1.
//! When the counter reaches the requested rank, the moved item takes that
//! position first; the remaining siblings continue with sequential positions,
//! splicing the item in before the next-due sibling. A rank past the last
//! sibling lands the item at the end. Every sibling receives a write even if
//! its position is unchanged: the result is idempotent, the I/O is not, and
//! the full pass is what repairs fragmentation left behind by deletions.
//!
//! # Example
//!
//! ```
//! use corkboard::core::model::ItemRef;
//! use corkboard::core::types::{CardId, Rank};
//! use corkboard::engine::plan::plan_insertion;
//! use corkboard::store::SiblingRow;
//!
//! // Scope [A=1, B=2, D=4]; move card C to rank 2.
//! let siblings = [
//!     SiblingRow { id: 1, position: 1 },
//!     SiblingRow { id: 2, position: 2 },
//!     SiblingRow { id: 4, position: 4 },
//! ];
//! let plan = plan_insertion(ItemRef::Card(CardId::new(3)), &siblings, Rank::clamped(2), None);
//! let out: Vec<(i64, i64)> = plan
//!     .writes()
//!     .iter()
//!     .map(|w| (w.item.raw_id(), w.position))
//!     .collect();
//! assert_eq!(out, vec![(1, 1), (3, 2), (2, 3), (4, 4)]);
//! ```

use crate::core::model::{ItemRef, ScopeRef};
use crate::core::profile::ItemKind;
use crate::core::types::{Position, Rank};
use crate::store::{PositionWrite, SiblingRow};

/// The ordered batch of position writes realizing one repositioning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    writes: Vec<PositionWrite>,
}

impl ReorderPlan {
    /// The writes, in the order they must be issued.
    pub fn writes(&self) -> &[PositionWrite] {
        &self.writes
    }

    /// Number of writes in the plan.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether the plan writes nothing (empty scope removal).
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Plan the insertion of `item` into a scope at `rank`.
///
/// `siblings` must be the scope's current children excluding `item`, ordered
/// by position ascending. `reparent` is carried on the item's write (and only
/// the item's write) when the caller is allowed to change its parent.
pub fn plan_insertion(
    item: ItemRef,
    siblings: &[SiblingRow],
    rank: Rank,
    reparent: Option<ScopeRef>,
) -> ReorderPlan {
    let mut writes = Vec::with_capacity(siblings.len() + 1);
    let mut next: Position = 1;
    let mut placed = false;

    for row in siblings {
        if !placed && next == rank.get() {
            writes.push(PositionWrite {
                item,
                position: next,
                new_parent: reparent,
            });
            placed = true;
            next += 1;
        }
        writes.push(PositionWrite {
            item: ItemRef::from_raw(item.kind(), row.id),
            position: next,
            new_parent: None,
        });
        next += 1;
    }

    // Rank at or past the end of the walk: append.
    if !placed {
        writes.push(PositionWrite {
            item,
            position: next,
            new_parent: reparent,
        });
    }

    ReorderPlan { writes }
}

/// Plan the removal of an item from a scope: renumber the remaining
/// `siblings` to `1..=N` without reinserting the item anywhere.
pub fn plan_removal(kind: ItemKind, siblings: &[SiblingRow]) -> ReorderPlan {
    let writes = siblings
        .iter()
        .enumerate()
        .map(|(index, row)| PositionWrite {
            item: ItemRef::from_raw(kind, row.id),
            position: index as Position + 1,
            new_parent: None,
        })
        .collect();
    ReorderPlan { writes }
}
