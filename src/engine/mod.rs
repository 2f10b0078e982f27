//! engine
//!
//! The ordered-collection repositioning engine.
//!
//! # Architecture
//!
//! Every mutation follows the same lifecycle: validate against the current
//! state, plan the full write batch in memory, issue the writes through the
//! scope store, verify the contiguity invariant, commit. The pieces:
//!
//! - [`plan`] - Pure planning: ordered siblings in, position writes out
//! - [`reorder`] - The `move_item` entry points and cross-scope orchestration
//! - [`patch`] - Atomic partial updates (RFC 6902 `replace` subset)
//! - [`verify`] - Post-write contiguity checks inside the transaction
//!
//! # Invariants
//!
//! - After any successful operation, a scope with N children holds exactly
//!   the positions `1..=N`, and position order reproduces the caller's
//!   intended rank order.
//! - No operation commits partially: validation failures happen before the
//!   first write, and write-phase failures roll back the whole transaction.
//! - Cross-scope moves never leave an item duplicated or orphaned; both
//!   scopes change under one transaction or neither does.

pub mod patch;
pub mod plan;
pub mod reorder;
pub mod verify;

pub use patch::{apply_patch, apply_patch_in, PatchOp, PatchSet};
pub use plan::{plan_insertion, plan_removal, ReorderPlan};
pub use reorder::{move_item, move_item_in};
pub use verify::verify_scope;

use thiserror::Error;

use crate::core::model::{ItemRef, ScopeRef};
use crate::core::profile::ItemKind;
use crate::core::types::OrderingFingerprint;
use crate::store::StoreError;

/// Errors from engine operations.
///
/// The leading message text of each variant is stable; callers shaping user
/// responses match on it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Target scope does not exist or is the wrong kind for the item.
    #[error("invalid parent for reordering")]
    InvalidParent,

    /// The item to move does not exist.
    #[error("invalid item for reordering")]
    InvalidItem,

    /// A rank or position value was not an integral number.
    #[error("position must be numeric")]
    PositionNotNumeric,

    /// The change-set does not fit the entity's snapshot.
    #[error("patch cannot be applied: {reason}")]
    PatchNotApplicable { reason: String },

    /// The item's profile pins it to its current parent.
    #[error("a {kind} cannot be moved to a different parent")]
    ParentChangeForbidden { kind: ItemKind },

    /// Source and target scopes belong to different root aggregates.
    #[error("cannot move a {kind} across different boards")]
    CrossBoard { kind: ItemKind },

    /// Post-write verification found a broken ordering; the transaction is
    /// rolled back. Indicates a bug, not bad input.
    #[error("ordering verification failed for {scope}: {detail}")]
    Verify { scope: ScopeRef, detail: String },

    /// Storage failure; the enclosing transaction is rolled back.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Entity snapshot could not be encoded.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result of a successful repositioning.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// The item that moved.
    pub item: ItemRef,
    /// Scope the item came from.
    pub from: ScopeRef,
    /// Scope the item now belongs to (equal to `from` for in-place reorders).
    pub to: ScopeRef,
    /// Post-operation fingerprint of the target scope's ordering.
    pub to_fingerprint: OrderingFingerprint,
    /// Post-operation fingerprint of the source scope, when it changed.
    pub from_fingerprint: Option<OrderingFingerprint>,
}

/// Result of a successful patch.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// The patched item.
    pub item: ItemRef,
    /// Set when the change-set also repositioned the item.
    pub moved: Option<MoveOutcome>,
}
