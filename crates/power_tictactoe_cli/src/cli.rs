//! Command-line interface for power_tictactoe.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use power_tictactoe::{BoardSize, FirstPlayer, GameMode, Player, Settings};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Power Tic-Tac-Toe - tic-tac-toe with power cells, a swap rule and a minimax AI
#[derive(Parser, Debug)]
#[command(name = "power_tictactoe")]
#[command(about = "Configurable tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game on stdin/stdout
    Play {
        /// Game settings
        #[command(flatten)]
        settings: SettingsArgs,

        /// Print the game state as JSON after every command instead of the board
        #[arg(long)]
        json: bool,
    },

    /// Print the effective settings as TOML
    ShowConfig {
        /// Game settings
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Settings flags. Flags override values read from `--config`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsArgs {
    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board edge length (3, 4 or 5)
    #[arg(long)]
    pub size: Option<usize>,

    /// Marks in a row needed to win
    #[arg(long)]
    pub win_len: Option<usize>,

    /// human_vs_human or human_vs_ai
    #[arg(long)]
    pub mode: Option<GameMode>,

    /// Minimax search depth
    #[arg(long)]
    pub depth: Option<usize>,

    /// Let the AI make the first move
    #[arg(long)]
    pub ai_first: bool,

    /// Mark played by the AI (X or O)
    #[arg(long)]
    pub ai_symbol: Option<Player>,

    /// Number of power cells; 0 disables them
    #[arg(long)]
    pub power_cells: Option<usize>,

    /// Disable the swap rule
    #[arg(long)]
    pub no_swap: bool,
}

impl SettingsArgs {
    /// Loads the config file (or defaults) and applies the flags on top.
    #[instrument(skip(self), fields(config = ?self.config))]
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)
                .with_context(|| format!("Loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(size) = self.size {
            let size = BoardSize::try_from(size)?;
            settings = settings.with_size(size);
            // Keep a default win length playable on the new board
            if self.win_len.is_none() && *settings.win_len() > size.get() {
                settings = settings.with_win_len(size.get());
            }
        }
        if let Some(win_len) = self.win_len {
            settings = settings.with_win_len(win_len);
        }
        if let Some(mode) = self.mode {
            settings = settings.with_mode(mode);
        }
        if let Some(depth) = self.depth {
            settings = settings.with_ai_depth(depth);
        }
        if self.ai_first {
            settings = settings.with_first_player(FirstPlayer::Ai);
        }
        if let Some(symbol) = self.ai_symbol {
            settings = settings.with_ai_symbol(symbol);
        }
        if let Some(count) = self.power_cells {
            settings = settings
                .with_power_cells_enabled(count > 0)
                .with_power_cells_count(count);
        }
        if self.no_swap {
            settings = settings.with_swap_rule_enabled(false);
        }

        settings.validate()?;
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    fn play_args(args: &[&str]) -> SettingsArgs {
        match parse(args).command {
            Command::Play { settings, .. } => settings,
            other => panic!("Expected play, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = play_args(&["power_tictactoe", "play"]);
        assert_eq!(args, SettingsArgs::default());
        assert_eq!(args.resolve().unwrap(), Settings::default());
    }

    #[test]
    fn test_flags_override() {
        let args = play_args(&[
            "power_tictactoe",
            "play",
            "--size",
            "5",
            "--win-len",
            "4",
            "--mode",
            "human_vs_human",
            "--depth",
            "2",
            "--ai-first",
            "--ai-symbol",
            "x",
            "--power-cells",
            "0",
            "--no-swap",
        ]);
        let settings = args.resolve().unwrap();
        assert_eq!(*settings.size(), BoardSize::Five);
        assert_eq!(*settings.win_len(), 4);
        assert_eq!(*settings.mode(), GameMode::HumanVsHuman);
        assert_eq!(*settings.ai_depth(), 2);
        assert_eq!(*settings.first_player(), FirstPlayer::Ai);
        assert_eq!(*settings.ai_symbol(), Player::X);
        assert!(!*settings.power_cells_enabled());
        assert!(!*settings.swap_rule_enabled());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "size = 4\nwin_len = 4\nai_depth = 5").unwrap();
        let path = file.path().to_str().unwrap();

        let args = play_args(&["power_tictactoe", "play", "--config", path, "--depth", "1"]);
        let settings = args.resolve().unwrap();
        assert_eq!(*settings.size(), BoardSize::Four);
        assert_eq!(*settings.win_len(), 4);
        assert_eq!(*settings.ai_depth(), 1);
    }

    #[test]
    fn test_invalid_combination_rejected() {
        let args = play_args(&["power_tictactoe", "play", "--win-len", "5"]);
        assert!(args.resolve().is_err());

        let args = play_args(&["power_tictactoe", "play", "--size", "7"]);
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_unknown_mode_is_a_parse_error() {
        assert!(Cli::try_parse_from(["power_tictactoe", "play", "--mode", "online"]).is_err());
    }

    #[test]
    fn test_show_config_subcommand() {
        match parse(&["power_tictactoe", "show-config", "--size", "4"]).command {
            Command::ShowConfig { settings } => assert_eq!(settings.size, Some(4)),
            other => panic!("Expected show-config, got {:?}", other),
        }
    }
}
