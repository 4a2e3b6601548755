//! Preconditions for moves.
//!
//! Each check is a small named rule; [`LegalMove`] composes them in the
//! order the engine reports failures.

use crate::action::Move;
use crate::error::MoveError;
use crate::game::GameState;
use crate::invariants::{GameInvariants, InvariantSet};
use tracing::{instrument, warn};

/// Precondition: the game has not finished.
pub struct GameInProgress;

impl GameInProgress {
    /// Fails with [`MoveError::GameOver`] once the game has an outcome.
    pub fn check(game: &GameState) -> Result<(), MoveError> {
        if game.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the position lies on the board.
pub struct OnBoard;

impl OnBoard {
    /// Fails with [`MoveError::OutOfBounds`] for off-board positions.
    pub fn check(mov: &Move, game: &GameState) -> Result<(), MoveError> {
        if game.board().contains(mov.position) {
            Ok(())
        } else {
            Err(MoveError::OutOfBounds(mov.position))
        }
    }
}

/// Precondition: the square at the move's position must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Fails with [`MoveError::SquareOccupied`] when a mark is already there.
    pub fn check(mov: &Move, game: &GameState) -> Result<(), MoveError> {
        if game.board().is_empty(mov.position) {
            Ok(())
        } else {
            Err(MoveError::SquareOccupied(mov.position))
        }
    }
}

/// Precondition: it must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`MoveError::WrongPlayer`] out of turn.
    pub fn check(mov: &Move, game: &GameState) -> Result<(), MoveError> {
        if mov.player == game.turn() {
            Ok(())
        } else {
            Err(MoveError::WrongPlayer(mov.player))
        }
    }
}

/// Composite precondition: all of the above.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameState) -> Result<(), MoveError> {
        GameInProgress::check(game)?;
        OnBoard::check(mov, game)?;
        SquareIsEmpty::check(mov, game)?;
        PlayersTurn::check(mov, game)?;
        Ok(())
    }
}

/// Asserts that all game invariants hold (panics on violation in debug builds).
pub fn assert_invariants(game: &GameState) {
    if cfg!(debug_assertions)
        && let Err(violations) = GameInvariants::check_all(game)
    {
        for v in &violations {
            warn!(description = %v.description, "Invariant violated");
        }
        panic!("Game invariants violated: {:?}", violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::types::{Player, Position};

    fn local_game() -> GameState {
        GameState::new(
            Settings::default()
                .with_mode(crate::settings::GameMode::HumanVsHuman)
                .with_power_cells_enabled(false),
        )
        .unwrap()
    }

    #[test]
    fn test_legal_move_passes() {
        let game = local_game();
        let mov = Move::new(Player::X, Position::new(1, 1));
        assert!(LegalMove::check(&mov, &game).is_ok());
    }

    #[test]
    fn test_occupied_square() {
        let mut game = local_game();
        game.apply_move(Position::new(1, 1), Player::X).unwrap();
        let mov = Move::new(Player::O, Position::new(1, 1));
        assert_eq!(
            LegalMove::check(&mov, &game),
            Err(MoveError::SquareOccupied(Position::new(1, 1)))
        );
    }

    #[test]
    fn test_wrong_turn() {
        let game = local_game();
        let mov = Move::new(Player::O, Position::new(0, 0));
        assert_eq!(
            LegalMove::check(&mov, &game),
            Err(MoveError::WrongPlayer(Player::O))
        );
    }

    #[test]
    fn test_off_board_checked_before_occupancy() {
        let game = local_game();
        let mov = Move::new(Player::X, Position::new(0, 7));
        assert_eq!(
            LegalMove::check(&mov, &game),
            Err(MoveError::OutOfBounds(Position::new(0, 7)))
        );
    }
}
