//! engine::reorder
//!
//! The repositioning entry points.
//!
//! # Lifecycle
//!
//! A move validates its inputs, plans the write batch, issues it through the
//! scope store, and verifies the contiguity invariant, all inside one
//! transaction. A cross-scope move is two sequential single-scope passes
//! (remove from the source, insert into the destination) under that same
//! transaction, so a failure in the second pass leaves the source ordering
//! untouched.
//!
//! # Validation order
//!
//! All validation happens before the first write: the target scope must
//! exist and be the right kind for the item, the item must exist, a parent
//! change must be permitted by the item's ordering profile, and both scopes
//! must belong to the same board.

use tracing::debug;

use crate::core::model::{ItemRef, ScopeRef};
use crate::core::profile::CrossScope;
use crate::core::types::Rank;
use crate::store::{ScopeStore, Transactional};

use super::plan::{plan_insertion, plan_removal};
use super::verify::verify_scope;
use super::{EngineError, MoveOutcome};

/// Move `item` to `rank` within `target`, opening a fresh transaction.
///
/// This is the `moveTo` operation of the public surface. Same-scope calls
/// reorder in place; calls with a different target scope relocate the item
/// when its profile permits. The rank is clamped to `[1, N+1]`.
pub fn move_item<S: Transactional>(
    store: &mut S,
    item: ItemRef,
    target: ScopeRef,
    rank: Rank,
) -> Result<MoveOutcome, EngineError> {
    debug!(%item, %target, %rank, "repositioning item");
    store.with_transaction(|view| move_item_in(view, item, target, rank))
}

/// Move `item` within an ambient transaction.
///
/// Callers that already hold a transaction view (the patch applier) compose
/// through this entry point; nothing commits or rolls back here.
pub fn move_item_in(
    view: &dyn ScopeStore,
    item: ItemRef,
    target: ScopeRef,
    rank: Rank,
) -> Result<MoveOutcome, EngineError> {
    let profile = item.kind().profile();

    if target.kind() != profile.parent_kind || !view.scope_exists(target)? {
        return Err(EngineError::InvalidParent);
    }
    let current = view.load_item(item)?.ok_or(EngineError::InvalidItem)?;
    let source = current.parent();

    if source != target {
        if profile.cross_scope == CrossScope::Forbidden {
            return Err(EngineError::ParentChangeForbidden { kind: item.kind() });
        }
        let source_board = view.root_board(source)?.ok_or(EngineError::InvalidParent)?;
        let target_board = view.root_board(target)?.ok_or(EngineError::InvalidParent)?;
        if source_board != target_board {
            return Err(EngineError::CrossBoard { kind: item.kind() });
        }

        // Phase one: drop the item out of its source scope.
        let source_siblings = view.siblings_of(source, Some(item))?;
        for write in plan_removal(item.kind(), &source_siblings).writes() {
            view.write_position(write)?;
        }
    }

    // Phase two (or the only phase): insert at the requested rank.
    let siblings = view.siblings_of(target, Some(item))?;
    let reparent = match profile.cross_scope {
        CrossScope::Allowed => Some(target),
        CrossScope::Forbidden => None,
    };
    for write in plan_insertion(item, &siblings, rank, reparent).writes() {
        view.write_position(write)?;
    }

    let to_fingerprint = verify_scope(view, target)?;
    let from_fingerprint = if source != target {
        Some(verify_scope(view, source)?)
    } else {
        None
    };

    Ok(MoveOutcome {
        item,
        from: source,
        to: target,
        to_fingerprint,
        from_fingerprint,
    })
}
