//! History consistency invariant: every mark on the board has a history entry.

use super::Invariant;
use crate::game::GameState;
use crate::types::Cell;

/// Invariant: history matches the board.
///
/// History length equals the number of occupied cells, and every
/// recorded move's cell holds that move's player.
pub struct HistoryConsistentInvariant;

impl Invariant<GameState> for HistoryConsistentInvariant {
    fn holds(game: &GameState) -> bool {
        let board = game.board();
        game.history().len() == board.occupied_count()
            && game
                .history()
                .iter()
                .all(|m| board.get(m.position) == Some(Cell::Occupied(m.player)))
    }

    fn description() -> &'static str {
        "History matches the occupied cells"
    }
}
