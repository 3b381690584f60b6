//! Position sequencing for a spread.

use oracle_core::{Position, SpreadType};

/// The ordered positions of a spread type.
pub fn positions_for(spread_type: SpreadType) -> &'static [Position] {
    spread_type.positions()
}

/// The position the next draw fills, or `None` once every slot is filled.
pub fn next_position(spread_type: SpreadType, filled: usize) -> Option<Position> {
    positions_for(spread_type).get(filled).copied()
}
