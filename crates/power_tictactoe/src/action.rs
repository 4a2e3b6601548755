//! Moves and the report produced when one is applied.
//!
//! A [`Move`] is plain data: who placed where. Validation and effects live
//! in [`GameState::apply_move`](crate::GameState::apply_move).

use crate::rules::Outcome;
use crate::types::{Player, Position};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{player} -> {position}")]
pub struct Move {
    /// Mover.
    pub player: Player,
    /// Target cell.
    pub position: Position,
}

impl Move {
    /// Pairs a player with a cell.
    pub fn new(player: Player, position: Position) -> Self {
        Self { player, position }
    }
}

/// What happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// The move that was applied.
    pub applied: Move,
    /// The move landed on a power cell; the same player moves again.
    pub extra_turn: bool,
    /// The swap rule became available with this move.
    pub swap_unlocked: bool,
    /// Set when the move ended the game.
    pub outcome: Option<Outcome>,
}

impl MoveReport {
    /// True when the move ended the game.
    pub fn is_final(&self) -> bool {
        self.outcome.is_some()
    }
}
