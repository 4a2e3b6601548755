//! Tests for loading settings from TOML files.

use power_tictactoe::{BoardSize, FirstPlayer, GameMode, Player, Session, Settings};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_file() {
    let file = write_config(
        r##"
size = 4
win_len = 3
mode = "human_vs_ai"
ai_depth = 2
first_player = "ai"
ai_symbol = "X"
power_cells_enabled = false
power_cells_count = 0
swap_rule_enabled = true
swap_after_moves_each = 2

[display_symbols]
x = "#"
o = "@"
"##,
    );

    let settings = Settings::from_file(file.path()).unwrap();
    assert_eq!(*settings.size(), BoardSize::Four);
    assert_eq!(*settings.first_player(), FirstPlayer::Ai);
    assert_eq!(*settings.ai_symbol(), Player::X);
    assert_eq!(*settings.swap_after_moves_each(), 2);

    let session = Session::new(settings).unwrap();
    assert_eq!(session.state().history().len(), 1);
    assert_eq!(session.state().display_symbol(Player::X), "#");
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = write_config("");
    let settings = Settings::from_file(file.path()).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(*settings.mode(), GameMode::HumanVsAi);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read"));
}

#[test]
fn test_invalid_values_rejected() {
    let file = write_config("power_cells_count = 12\n");
    let err = Settings::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Invalid settings"));

    let file = write_config("mode = \"online\"\n");
    let err = Settings::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse"));
}

#[test]
fn test_saved_settings_reload() {
    let settings = Settings::default()
        .with_size(BoardSize::Five)
        .with_win_len(4)
        .with_ai_depth(2);
    let file = write_config(&settings.to_toml().unwrap());
    assert_eq!(Settings::from_file(file.path()).unwrap(), settings);
}
