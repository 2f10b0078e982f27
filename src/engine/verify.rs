//! engine::verify
//!
//! Post-write invariant verification.
//!
//! After the write pass of a repositioning operation, and before its
//! transaction commits, the affected scope is re-read and checked against the
//! contiguity invariant: N children must hold exactly the positions `1..=N`.
//! A violation here indicates a bug in the planner or the store, not bad
//! input; it aborts the transaction so a broken ordering is never committed.

use crate::core::model::ScopeRef;
use crate::core::types::{OrderingFingerprint, Position};
use crate::store::ScopeStore;

use super::EngineError;

/// Check the contiguity invariant for `scope` and return the fingerprint of
/// its ordering.
pub fn verify_scope(
    view: &dyn ScopeStore,
    scope: ScopeRef,
) -> Result<OrderingFingerprint, EngineError> {
    let rows = view.siblings_of(scope, None)?;
    for (index, row) in rows.iter().enumerate() {
        let expected = index as Position + 1;
        if row.position != expected {
            return Err(EngineError::Verify {
                scope,
                detail: format!(
                    "child {} holds position {} where {} was expected",
                    row.id, row.position, expected
                ),
            });
        }
    }
    Ok(OrderingFingerprint::compute(
        rows.iter().map(|row| (row.id, row.position)),
    ))
}
