//! Error types for the engine.

use crate::types::{Player, Position};
use derive_more::{Display, Error};
use tracing::instrument;

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveError {
    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The position is not on the board.
    #[display("Position {} is off the board", _0)]
    OutOfBounds(Position),

    /// The square at the position is already occupied.
    #[display("Square at {} is already occupied", _0)]
    SquareOccupied(Position),

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),
}

impl std::error::Error for MoveError {}

/// A settings combination the engine refuses to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SettingsError {
    /// Board edge length other than 3, 4 or 5.
    #[display("Board size {} is not one of 3, 4, 5", _0)]
    UnsupportedSize(usize),

    /// Win length outside `3..=size`.
    #[display("Win length {} must be between 3 and {}", win_len, size)]
    WinLength {
        /// Requested win length.
        win_len: usize,
        /// Board edge length.
        size: usize,
    },

    /// AI search depth of zero.
    #[display("AI depth must be at least 1")]
    ZeroDepth,

    /// More power cells than the board has cells.
    #[display("{} power cells do not fit on a board of {} cells", count, capacity)]
    TooManyPowerCells {
        /// Requested power cell count.
        count: usize,
        /// Cells on the board.
        capacity: usize,
    },

    /// Swap threshold other than 1 or 2.
    #[display("Swap threshold {} must be 1 or 2", _0)]
    SwapThreshold(usize),
}

impl std::error::Error for SettingsError {}

/// Errors returned by engine operations.
///
/// Every operation that returns one of these leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// Occupied cell, off-board position, wrong player or finished game.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),

    /// History is empty.
    #[display("Nothing to undo")]
    NothingToUndo,

    /// Swap rule disabled, threshold unmet, or already used.
    #[display("Swap is not available")]
    SwapUnavailable,

    /// Settings failed validation.
    #[display("Invalid settings: {}", _0)]
    InvalidSettings(SettingsError),
}

impl From<MoveError> for EngineError {
    fn from(err: MoveError) -> Self {
        EngineError::IllegalMove(err)
    }
}

impl From<SettingsError> for EngineError {
    fn from(err: SettingsError) -> Self {
        EngineError::InvalidSettings(err)
    }
}

/// Configuration file error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<SettingsError> for ConfigError {
    #[track_caller]
    fn from(err: SettingsError) -> Self {
        Self::new(format!("Invalid settings: {}", err))
    }
}

/// Errors from the multi-session registry.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// A session with this id is already registered.
    #[display("Session {} already exists", _0)]
    AlreadyExists(#[error(not(source))] String),

    /// No session with this id.
    #[display("Session {} not found", _0)]
    NotFound(#[error(not(source))] String),

    /// The engine rejected the operation.
    #[display("{}", _0)]
    Engine(EngineError),
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        SessionError::Engine(err)
    }
}
