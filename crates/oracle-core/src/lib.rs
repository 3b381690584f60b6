//! Core types for the oracle spread engine.
//!
//! This crate holds the reference data a spread is built from (cards and
//! decks) and the fixed spread shapes with their named positions. It has no
//! randomness, storage, or network code; see `oracle-spread` for the engine.

/// Cards and the deck they are drawn from.
pub mod card;
/// Error types used throughout the crate.
pub mod error;
/// Spread shapes, positions, drawn cards, and saved-spread identifiers.
pub mod spread;

/// Re-export card types.
pub use card::{Card, Deck};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export spread types.
pub use spread::{DrawnCard, Position, SpreadId, SpreadType};
