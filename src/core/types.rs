//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BoardId`] / [`ColumnId`] / [`CardId`] / [`TaskId`] - Typed row identifiers
//! - [`Rank`] - 1-based target position within a scope, clamped at construction
//! - [`Position`] - Persisted position value of an item among its siblings
//! - [`OrderingFingerprint`] - Digest of a scope's ordering for observers
//!
//! # Validation
//!
//! Identifiers are only handed out by the store (insert/load), so a typed id
//! in hand always refers to a row that existed at read time. [`Rank`] enforces
//! the 1-based contract at construction time: values below 1 clamp to 1, and
//! values past the end of a scope clamp to append-at-end when the plan is
//! computed.
//!
//! # Examples
//!
//! ```
//! use corkboard::core::types::Rank;
//!
//! assert_eq!(Rank::clamped(0).get(), 1);
//! assert_eq!(Rank::clamped(-7).get(), 1);
//! assert_eq!(Rank::clamped(3).get(), 3);
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Persisted position of an item among its siblings (1-based after any
/// successful repositioning; deletion may leave gaps until the next move).
pub type Position = i64;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw row id.
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type! {
    /// Identifier of a board (the root aggregate).
    BoardId
}

id_type! {
    /// Identifier of a column within a board.
    ColumnId
}

id_type! {
    /// Identifier of a card within a column.
    CardId
}

id_type! {
    /// Identifier of a task within a card.
    TaskId
}

/// A 1-based target rank within a scope.
///
/// The repositioning contract clamps requested ranks to `[1, N+1]`: anything
/// below 1 becomes 1 here, and anything past the last sibling lands at the
/// end when the insertion plan is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(i64);

impl Rank {
    /// Front of the scope.
    pub const FIRST: Rank = Rank(1);

    /// Build a rank from a caller-supplied offset, clamping values below 1.
    pub fn clamped(offset: i64) -> Self {
        Self(offset.max(1))
    }

    /// The 1-based rank value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digest of a scope's ordering.
///
/// Computed over the ordered `(id, position)` rows of a scope after a
/// successful operation. Two scopes with the same members in the same order
/// produce the same fingerprint, so an embedding layer can cheaply detect
/// whether an ordering it cached is still current.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderingFingerprint(String);

impl OrderingFingerprint {
    /// Compute the fingerprint of an ordered sequence of `(id, position)` rows.
    pub fn compute<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, Position)>,
    {
        let mut hasher = Sha256::new();
        for (id, position) in rows {
            hasher.update(id.to_be_bytes());
            hasher.update(position.to_be_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderingFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
