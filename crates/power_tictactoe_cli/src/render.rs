//! Text rendering of a game for the terminal.

use power_tictactoe::{GameState, Move, Outcome, Position};

/// Marker for an empty power cell.
pub const POWER_CELL: &str = "💠";

/// Marker for an empty cell.
pub const EMPTY: &str = ".";

/// History entries shown, newest first.
pub const HISTORY_LIMIT: usize = 50;

/// Board grid with one-based row and column labels.
pub fn board(state: &GameState) -> String {
    let board = state.board();
    let n = board.dimension();
    let header: String = (1..=n).map(|c| format!(" {c}")).collect();
    let rows = (0..n).map(|r| {
        let marks: String = board
            .row(r)
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let mark = match cell.player() {
                    Some(player) => state.display_symbol(player),
                    None if state.power_cells().contains(Position::new(r, c)) => POWER_CELL,
                    None => EMPTY,
                };
                format!(" {mark}")
            })
            .collect();
        format!("{} {marks}", r + 1)
    });
    std::iter::once(format!("  {header}"))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

fn positions(line: &[Position]) -> String {
    line.iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn entry(state: &GameState, mov: &Move) -> String {
    format!(
        "{} ({}) at {}",
        mov.player,
        state.display_symbol(mov.player),
        mov.position
    )
}

/// Turn or result, power cells, swap status.
pub fn status(state: &GameState) -> String {
    let settings = state.settings();
    let mut out = format!(
        "Mode: {} | Board: {}, Win: {}",
        settings.mode().label(),
        settings.size(),
        settings.win_len()
    );
    match state.outcome() {
        Some(Outcome::Winner { player, line }) => {
            out.push_str(&format!(
                "\nWinner: {} ({})\nWinning line: {}",
                player,
                state.display_symbol(*player),
                positions(line)
            ));
        }
        Some(Outcome::Draw) => out.push_str("\nDraw!"),
        None => {
            let turn = state.turn();
            out.push_str(&format!("\nTurn: {} ({})", turn, state.display_symbol(turn)));
        }
    }
    out.push_str(&format!("\nPower cells left: {}", state.power_cells().len()));
    if state.swap_available() {
        out.push_str("\nSwap is available! Type `swap` to exchange symbols.");
    } else if state.has_swapped() {
        out.push_str("\nSymbols have been swapped.");
    }
    out
}

/// Move history, newest first, capped at [`HISTORY_LIMIT`] entries.
pub fn history(state: &GameState) -> String {
    let moves = state.history();
    if moves.is_empty() {
        return "History: no moves yet".to_string();
    }
    let entries: Vec<String> = moves
        .iter()
        .enumerate()
        .rev()
        .take(HISTORY_LIMIT)
        .map(|(i, mov)| format!("{:>3}. {}", i + 1, entry(state, mov)))
        .collect();
    format!("History (latest first):\n{}", entries.join("\n"))
}

/// Everything shown after a command.
pub fn game(state: &GameState) -> String {
    format!("{}\n\n{}\n\n{}", board(state), status(state), history(state))
}

/// One line describing a move and what it triggered.
pub fn move_line(state: &GameState, mov: &Move, extra_turn: bool, swap_unlocked: bool) -> String {
    let mut line = entry(state, mov);
    if extra_turn {
        line.push_str(" - power cell, extra turn!");
    }
    if swap_unlocked {
        line.push_str(" - swap unlocked");
    }
    line
}
