//! Game settings: typed, validated, loadable from TOML.

use crate::error::{ConfigError, SettingsError};
use crate::types::{BoardSize, Player};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::EnumString;
use tracing::{debug, info, instrument};

/// Who the opponents are.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GameMode {
    /// Two people share the board.
    HumanVsHuman,
    /// One person plays the minimax AI.
    #[default]
    HumanVsAi,
}

impl GameMode {
    /// Returns the display label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::HumanVsHuman => "Human vs Human (Local)",
            Self::HumanVsAi => "Human vs AI",
        }
    }
}

/// Which side takes the first move in a new game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FirstPlayer {
    /// The human moves first.
    #[default]
    Human,
    /// The AI moves first.
    Ai,
}

/// Strings shown for each player's mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySymbols {
    /// Shown for X.
    pub x: String,
    /// Shown for O.
    pub o: String,
}

impl DisplaySymbols {
    /// Creates a symbol pair.
    pub fn new(x: impl Into<String>, o: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            o: o.into(),
        }
    }

    /// Symbol for a player, falling back to the letter when blank.
    pub fn symbol(&self, player: Player) -> &str {
        let raw = match player {
            Player::X => self.x.trim(),
            Player::O => self.o.trim(),
        };
        if raw.is_empty() {
            match player {
                Player::X => "X",
                Player::O => "O",
            }
        } else {
            raw
        }
    }

    /// The pair with X and O exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            x: self.o.clone(),
            o: self.x.clone(),
        }
    }
}

impl Default for DisplaySymbols {
    fn default() -> Self {
        Self::new("❌", "⭕")
    }
}

/// Configuration for one game. Changing settings resets the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct Settings {
    /// Board edge length.
    size: BoardSize,
    /// Marks in a row needed to win.
    win_len: usize,
    /// Human vs human or human vs AI.
    mode: GameMode,
    /// Minimax depth limit.
    ai_depth: usize,
    /// Who opens the game.
    first_player: FirstPlayer,
    /// Mark played by the AI.
    ai_symbol: Player,
    /// Whether power cells are placed on the board.
    power_cells_enabled: bool,
    /// How many power cells to place.
    power_cells_count: usize,
    /// Whether the swap rule is active.
    swap_rule_enabled: bool,
    /// Moves each player must have placed before a swap is offered.
    swap_after_moves_each: usize,
    /// Strings shown for X and O.
    #[setters(into)]
    display_symbols: DisplaySymbols,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: BoardSize::Three,
            win_len: 3,
            mode: GameMode::HumanVsAi,
            ai_depth: 3,
            first_player: FirstPlayer::Human,
            ai_symbol: Player::O,
            power_cells_enabled: true,
            power_cells_count: 1,
            swap_rule_enabled: true,
            swap_after_moves_each: 1,
            display_symbols: DisplaySymbols::default(),
        }
    }
}

impl Settings {
    /// Checks that the combination is playable.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), SettingsError> {
        let n = self.size.get();
        if !(3..=n).contains(&self.win_len) {
            return Err(SettingsError::WinLength {
                win_len: self.win_len,
                size: n,
            });
        }
        if self.ai_depth == 0 {
            return Err(SettingsError::ZeroDepth);
        }
        if self.power_cells_count > self.size.cell_count() {
            return Err(SettingsError::TooManyPowerCells {
                count: self.power_cells_count,
                capacity: self.size.cell_count(),
            });
        }
        if !(1..=2).contains(&self.swap_after_moves_each) {
            return Err(SettingsError::SwapThreshold(self.swap_after_moves_each));
        }
        Ok(())
    }

    /// The mark the AI plays, or `None` in human-vs-human games.
    pub fn ai_player(&self) -> Option<Player> {
        match self.mode {
            GameMode::HumanVsAi => Some(self.ai_symbol),
            GameMode::HumanVsHuman => None,
        }
    }

    /// The mark the single human plays against the AI.
    pub fn human_player(&self) -> Option<Player> {
        self.ai_player().map(Player::opponent)
    }

    /// The player who opens a fresh game.
    pub fn starting_player(&self) -> Player {
        match (self.mode, self.first_player) {
            (_, FirstPlayer::Ai) => self.ai_symbol,
            (GameMode::HumanVsAi, FirstPlayer::Human) => self.ai_symbol.opponent(),
            (GameMode::HumanVsHuman, FirstPlayer::Human) => Player::X,
        }
    }

    /// Number of power cells actually placed.
    pub fn effective_power_cells(&self) -> usize {
        if self.power_cells_enabled {
            self.power_cells_count
        } else {
            0
        }
    }

    /// Parses and validates settings from TOML. Missing keys take defaults.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;
        let settings = Self::from_toml_str(&content)?;
        info!(size = %settings.size, win_len = settings.win_len, "Settings loaded");
        Ok(settings)
    }

    /// Serializes the settings as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize settings: {}", e)))
    }
}
