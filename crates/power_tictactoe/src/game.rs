//! The move engine: game state and its transitions.
//!
//! [`GameState`] owns everything about one game. It changes only through
//! [`GameState::apply_move`], [`GameState::undo`], [`GameState::swap_symbols`],
//! [`GameState::reset`] and [`GameState::apply_settings`]. Each of these
//! either applies fully or returns an error with the state untouched.

use crate::action::{Move, MoveReport};
use crate::contracts::{LegalMove, assert_invariants};
use crate::error::{EngineError, MoveError};
use crate::power_cells::PowerCells;
use crate::rules::{Outcome, WinLines};
use crate::settings::Settings;
use crate::types::{Board, Cell, Player, Position};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Swap rule flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwapState {
    /// Both players reached the threshold and no swap has happened yet.
    pub swap_available: bool,
    /// The single swap of this game has been used.
    pub has_swapped: bool,
}

/// Current status of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are accepted.
    InProgress,
    /// Game ended.
    Over(Outcome),
}

/// Everything `undo` needs to put back besides the mark itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Checkpoint {
    turn: Player,
    power_cells: PowerCells,
    swap: SwapState,
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    settings: Settings,
    #[serde(skip)]
    lines: WinLines,
    board: Board,
    turn: Player,
    status: GameStatus,
    history: Vec<Move>,
    #[serde(skip)]
    checkpoints: Vec<Checkpoint>,
    power_cells: PowerCells,
    swap: SwapState,
}

impl GameState {
    /// Starts a game with validated settings.
    #[instrument(skip(settings), fields(size = %settings.size(), win_len = settings.win_len()))]
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self::fresh(settings))
    }

    /// Starts a game with an explicit power cell layout instead of the generated one.
    ///
    /// The layout lasts until the next reset, which regenerates cells from the settings.
    #[instrument(skip(settings, cells))]
    pub fn with_power_cells(
        settings: Settings,
        cells: impl IntoIterator<Item = Position>,
    ) -> Result<Self, EngineError> {
        let mut game = Self::new(settings)?;
        let cells: PowerCells = cells.into_iter().collect();
        if let Some(&pos) = cells.as_slice().iter().find(|&&p| !game.board.contains(p)) {
            return Err(MoveError::OutOfBounds(pos).into());
        }
        game.power_cells = cells;
        Ok(game)
    }

    fn fresh(settings: Settings) -> Self {
        let size = *settings.size();
        let game = Self {
            lines: WinLines::new(size, *settings.win_len()),
            board: Board::new(size),
            turn: settings.starting_player(),
            status: GameStatus::InProgress,
            history: Vec::new(),
            checkpoints: Vec::new(),
            power_cells: PowerCells::generate(size, settings.effective_power_cells()),
            swap: SwapState::default(),
            settings,
        };
        info!(
            size = %size,
            turn = %game.turn,
            power_cells = game.power_cells.len(),
            "New game"
        );
        game
    }

    /// Places `player`'s mark at `pos`.
    ///
    /// Landing on a power cell consumes it and keeps the turn with the same
    /// player unless the move ends the game.
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn apply_move(&mut self, pos: Position, player: Player) -> Result<MoveReport, EngineError> {
        let mov = Move::new(player, pos);
        LegalMove::check(&mov, self).inspect_err(|e| {
            warn!(error = %e, "Rejected move");
        })?;

        self.checkpoints.push(Checkpoint {
            turn: self.turn,
            power_cells: self.power_cells.clone(),
            swap: self.swap,
        });
        self.board.put(pos, Cell::Occupied(player));
        self.history.push(mov);
        let on_power_cell = self.power_cells.consume(pos);

        let mut report = MoveReport {
            applied: mov,
            extra_turn: false,
            swap_unlocked: false,
            outcome: None,
        };

        if let Some(outcome) = self.lines.evaluate(&self.board) {
            info!(%outcome, "Game over");
            self.status = GameStatus::Over(outcome.clone());
            report.outcome = Some(outcome);
        } else {
            if on_power_cell {
                debug!(%pos, "Power cell used, same player moves again");
                report.extra_turn = true;
            } else {
                self.turn = player.opponent();
            }
            report.swap_unlocked = self.refresh_swap();
        }

        assert_invariants(self);
        Ok(report)
    }

    /// Marks the swap as available once both players reached the threshold.
    fn refresh_swap(&mut self) -> bool {
        if !*self.settings.swap_rule_enabled() || self.swap.has_swapped || self.swap.swap_available {
            return false;
        }
        let threshold = *self.settings.swap_after_moves_each();
        if self.placed_count(Player::X) >= threshold && self.placed_count(Player::O) >= threshold {
            debug!(threshold, "Swap now available");
            self.swap.swap_available = true;
            return true;
        }
        false
    }

    /// Takes back the last move, restoring the exact state before it.
    ///
    /// Restores the turn, a consumed power cell and the swap flags, and
    /// reopens a finished game.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<Move, EngineError> {
        let (Some(mov), Some(checkpoint)) = (self.history.pop(), self.checkpoints.pop()) else {
            debug!("Nothing to undo");
            return Err(EngineError::NothingToUndo);
        };
        self.board.put(mov.position, Cell::Empty);
        self.turn = checkpoint.turn;
        self.power_cells = checkpoint.power_cells;
        self.swap = checkpoint.swap;
        self.status = GameStatus::InProgress;
        debug!(%mov, "Move undone");
        assert_invariants(self);
        Ok(mov)
    }

    /// Exchanges the two players' display symbols. Board, turn and history are untouched.
    #[instrument(skip(self))]
    pub fn swap_symbols(&mut self) -> Result<(), EngineError> {
        if !*self.settings.swap_rule_enabled() || !self.swap.swap_available || self.swap.has_swapped {
            warn!(swap = ?self.swap, "Swap requested while unavailable");
            return Err(EngineError::SwapUnavailable);
        }
        self.swap = SwapState {
            swap_available: false,
            has_swapped: true,
        };
        info!("Symbols swapped");
        Ok(())
    }

    /// Starts over with the current settings.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::fresh(self.settings.clone());
    }

    /// Validates new settings and starts over with them.
    #[instrument(skip(self, settings))]
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), EngineError> {
        settings.validate()?;
        *self = Self::fresh(settings);
        Ok(())
    }

    /// Settings this game was started with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Winning lines for this game's board and win length.
    pub fn win_lines(&self) -> &WinLines {
        &self.lines
    }

    /// Board snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move. After the game ends this is the player who moved last.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Game status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// True once the game has a winner or is drawn.
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over(_))
    }

    /// Outcome of a finished game.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.status {
            GameStatus::Over(outcome) => Some(outcome),
            GameStatus::InProgress => None,
        }
    }

    /// Winner of a finished game.
    pub fn winner(&self) -> Option<Player> {
        self.outcome().and_then(Outcome::winner)
    }

    /// Winning line, empty unless someone has won.
    pub fn winning_line(&self) -> &[Position] {
        self.outcome().map(Outcome::winning_line).unwrap_or(&[])
    }

    /// Moves played so far, newest last.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Moves placed by one player.
    pub fn placed_count(&self, player: Player) -> usize {
        self.history.iter().filter(|m| m.player == player).count()
    }

    /// Unused power cells.
    pub fn power_cells(&self) -> &PowerCells {
        &self.power_cells
    }

    /// Swap flags.
    pub fn swap(&self) -> SwapState {
        self.swap
    }

    /// True while a swap can be requested.
    pub fn swap_available(&self) -> bool {
        self.swap.swap_available
    }

    /// True once the swap has been used.
    pub fn has_swapped(&self) -> bool {
        self.swap.has_swapped
    }

    /// Symbol currently shown for a player's marks.
    pub fn display_symbol(&self, player: Player) -> &str {
        let symbols = self.settings.display_symbols();
        if self.swap.has_swapped {
            symbols.symbol(player.opponent())
        } else {
            symbols.symbol(player)
        }
    }

    /// Empty positions in row-major order.
    pub fn available_moves(&self) -> Vec<Position> {
        self.board.available_moves()
    }
}
