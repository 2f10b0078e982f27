//! Corkboard - ordered collections for Kanban-style boards
//!
//! Boards contain ordered columns, columns contain ordered cards, cards
//! contain ordered tasks. The heart of the crate is the repositioning
//! engine: whenever an item must be placed at a specific rank among its
//! siblings - possibly while also changing which parent it belongs to - the
//! engine recomputes the positions of the item and every displaced sibling
//! and writes them back in one transaction.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Plan -> Execute -> Verify repositioning lifecycle and the
//!   atomic patch applier
//! - [`core`] - Domain types, ordering profiles, configuration
//! - [`store`] - Single doorway to persistence (SQLite, plus an in-memory
//!   fake for tests)
//!
//! # Correctness Invariants
//!
//! Corkboard maintains the following invariants:
//!
//! 1. A scope with N children holds exactly the positions `1..=N` after any
//!    successful repositioning
//! 2. Ordering children by position reproduces the caller-intended rank order
//! 3. All mutations flow through the store's transactional boundary
//! 4. No operation is ever partially applied; failures roll back completely

pub mod cli;
pub mod core;
pub mod engine;
pub mod store;
