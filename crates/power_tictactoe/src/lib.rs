//! Power Tic-Tac-Toe - configurable tic-tac-toe with power cells and a swap rule
//!
//! # Architecture
//!
//! - **Board**: N×N grid for N in 3..=5
//! - **Rules**: win-line enumeration and outcome evaluation for any win length
//! - **Game**: the move engine; power cells grant an extra turn, the swap rule
//!   exchanges display symbols once, undo restores exact checkpoints
//! - **AI**: depth-limited minimax with a line-potential heuristic
//! - **Session**: command dispatch, AI turn driving, multi-session registry
//!
//! # Example
//!
//! ```
//! use power_tictactoe::{GameMode, Player, Position, Session, Settings};
//!
//! # fn example() -> Result<(), power_tictactoe::EngineError> {
//! let settings = Settings::default()
//!     .with_mode(GameMode::HumanVsHuman)
//!     .with_power_cells_enabled(false);
//! let mut session = Session::new(settings)?;
//! session.place(Position::new(1, 1))?;
//! assert_eq!(session.state().turn(), Player::O);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod ai;
mod error;
mod game;
mod power_cells;
mod rules;
mod session;
mod settings;
mod types;

// Public modules: precondition and invariant checks are part of the API
pub mod contracts;
pub mod invariants;

// Crate-level exports - Core types
pub use types::{Board, BoardSize, Cell, Player, Position};

// Crate-level exports - Errors
pub use error::{ConfigError, EngineError, MoveError, SessionError, SettingsError};

// Crate-level exports - Settings
pub use settings::{DisplaySymbols, FirstPlayer, GameMode, Settings};

// Crate-level exports - Rules
pub use rules::{Line, Outcome, WinLines, evaluate, winning_lines};

// Crate-level exports - Engine
pub use action::{Move, MoveReport};
pub use game::{GameState, GameStatus, SwapState};
pub use power_cells::{POWER_CELL_SEED, PowerCells, generate_power_cells};

// Crate-level exports - AI
pub use ai::{Minimax, SearchResult, WIN_SCORE, choose_move, choose_move_with_rng, heuristic};

// Crate-level exports - Sessions
pub use session::{Command, Event, Session, SessionId, SessionManager};
