//! Unused power cells are never occupied.

use super::Invariant;
use crate::game::GameState;

/// Invariant: every remaining power cell is empty.
///
/// A power cell is consumed by the move that lands on it, so an
/// occupied cell can never still be listed.
pub struct PowerCellsVacantInvariant;

impl Invariant<GameState> for PowerCellsVacantInvariant {
    fn holds(game: &GameState) -> bool {
        game.power_cells()
            .as_slice()
            .iter()
            .all(|&pos| game.board().is_empty(pos))
    }

    fn description() -> &'static str {
        "Remaining power cells are vacant"
    }
}
