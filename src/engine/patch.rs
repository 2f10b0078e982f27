//! engine::patch
//!
//! Atomic partial updates in the RFC 6902 JSON Patch subset.
//!
//! # Contract
//!
//! A patch is a sequence of `replace` operations addressed at an entity's
//! JSON snapshot (camelCase field names). The applier validates the whole
//! change-set against the snapshot before touching storage: unknown or
//! non-patchable paths and incompatible value shapes fail with "patch cannot
//! be applied" and no changes. A valid change-set is applied in one
//! transaction: non-positional fields are written first, and when the
//! post-patch position or parent differs the repositioning algorithm runs
//! inside the same transaction. A patch that renames an item and relocates it
//! either fully succeeds or leaves both the name and the position untouched.
//!
//! # Paths
//!
//! - column: `/title`, `/wipLimit`, `/position`
//! - card: `/title`, `/description`, `/dueDate`, `/estimate`, `/position`,
//!   `/columnId`
//! - task: `/title`, `/done`, `/position`, `/cardId`

use serde_json::Value;
use tracing::debug;

use crate::core::model::{Item, ItemRef};
use crate::core::profile::ItemKind;
use crate::core::types::Rank;
use crate::store::{ScopeStore, Transactional};

use super::reorder::move_item_in;
use super::{EngineError, PatchOutcome};

/// One patch operation. Only `replace` is part of the supported subset;
/// anything else fails at parse time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Replace { path: String, value: Value },
}

/// A parsed change-set.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PatchSet(Vec<PatchOp>);

impl PatchSet {
    pub fn new(ops: Vec<PatchOp>) -> Self {
        Self(ops)
    }

    /// Parse an RFC 6902 document. Unsupported operations are rejected here.
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw).map_err(|err| EngineError::PatchNotApplicable {
            reason: err.to_string(),
        })
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.0
    }
}

/// Value shapes accepted per patchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Text,
    NullableText,
    Integer,
    NullableInteger,
    Number,
    Bool,
}

impl Shape {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Shape::Text => value.is_string(),
            Shape::NullableText => value.is_string() || value.is_null(),
            Shape::Integer => value.as_i64().is_some(),
            Shape::NullableInteger => value.as_i64().is_some() || value.is_null(),
            Shape::Number => value.is_number(),
            Shape::Bool => value.is_boolean(),
        }
    }
}

fn field_shape(kind: ItemKind, path: &str) -> Option<Shape> {
    let shape = match (kind, path) {
        (ItemKind::Column, "/title") => Shape::Text,
        (ItemKind::Column, "/wipLimit") => Shape::NullableInteger,
        (ItemKind::Column, "/position") => Shape::Integer,
        (ItemKind::Card, "/title") => Shape::Text,
        (ItemKind::Card, "/description") => Shape::Text,
        (ItemKind::Card, "/dueDate") => Shape::NullableText,
        (ItemKind::Card, "/estimate") => Shape::Number,
        (ItemKind::Card, "/position") => Shape::Integer,
        (ItemKind::Card, "/columnId") => Shape::Integer,
        (ItemKind::Task, "/title") => Shape::Text,
        (ItemKind::Task, "/done") => Shape::Bool,
        (ItemKind::Task, "/position") => Shape::Integer,
        (ItemKind::Task, "/cardId") => Shape::Integer,
        _ => return None,
    };
    Some(shape)
}

/// Apply `patch` to `item` atomically, opening a fresh transaction.
pub fn apply_patch<S: Transactional>(
    store: &mut S,
    item: ItemRef,
    patch: &PatchSet,
) -> Result<PatchOutcome, EngineError> {
    debug!(%item, ops = patch.ops().len(), "applying patch");
    store.with_transaction(|view| apply_patch_in(view, item, patch))
}

/// Apply `patch` within an ambient transaction.
pub fn apply_patch_in(
    view: &dyn ScopeStore,
    item: ItemRef,
    patch: &PatchSet,
) -> Result<PatchOutcome, EngineError> {
    let before = view.load_item(item)?.ok_or(EngineError::InvalidItem)?;
    let kind = before.kind();

    // Validate the whole change-set against the snapshot before any write.
    for op in patch.ops() {
        let PatchOp::Replace { path, value } = op;
        let shape = field_shape(kind, path).ok_or_else(|| EngineError::PatchNotApplicable {
            reason: format!("path {path} is not patchable for a {kind}"),
        })?;
        if path == "/position" && value.as_i64().is_none() {
            return Err(EngineError::PositionNotNumeric);
        }
        if !shape.accepts(value) {
            return Err(EngineError::PatchNotApplicable {
                reason: format!("value for {path} has the wrong type"),
            });
        }
    }

    // Compute the post-patch snapshot.
    let mut snapshot = snapshot_of(&before)?;
    let Value::Object(fields) = &mut snapshot else {
        return Err(EngineError::PatchNotApplicable {
            reason: "entity snapshot is not an object".to_string(),
        });
    };
    for op in patch.ops() {
        let PatchOp::Replace { path, value } = op;
        let field = &path[1..];
        fields.insert(field.to_string(), value.clone());
    }

    let after = decode(kind, snapshot)?;

    // Non-positional fields first; the store ignores position and parent here.
    view.write_fields(&after)?;

    // Then reposition when the patch changed rank or parent.
    let moved = if after.position() != before.position() || after.parent() != before.parent() {
        Some(move_item_in(
            view,
            item,
            after.parent(),
            Rank::clamped(after.position()),
        )?)
    } else {
        None
    };

    Ok(PatchOutcome { item, moved })
}

fn snapshot_of(item: &Item) -> Result<Value, EngineError> {
    let value = match item {
        Item::Column(column) => serde_json::to_value(column)?,
        Item::Card(card) => serde_json::to_value(card)?,
        Item::Task(task) => serde_json::to_value(task)?,
    };
    Ok(value)
}

fn decode(kind: ItemKind, snapshot: Value) -> Result<Item, EngineError> {
    let not_applicable = |err: serde_json::Error| EngineError::PatchNotApplicable {
        reason: err.to_string(),
    };
    let item = match kind {
        ItemKind::Column => Item::Column(serde_json::from_value(snapshot).map_err(not_applicable)?),
        ItemKind::Card => Item::Card(serde_json::from_value(snapshot).map_err(not_applicable)?),
        ItemKind::Task => Item::Task(serde_json::from_value(snapshot).map_err(not_applicable)?),
    };
    Ok(item)
}
