//! Winning-line generation and board evaluation.

use super::Outcome;
use crate::types::{Board, BoardSize, Cell, Player, Position};
use tracing::instrument;

/// A run of `win_len` consecutive positions.
pub type Line = Vec<Position>;

/// Generates every candidate winning line on an `n`×`n` board.
///
/// Lines come out in a fixed order: rows, columns, down-right diagonals,
/// then up-right diagonals (read from the bottom row upward). Within each
/// group starts are enumerated row-major. Returns nothing when `win_len`
/// is zero or longer than the board.
#[instrument]
pub fn winning_lines(n: usize, win_len: usize) -> Vec<Line> {
    if win_len == 0 || win_len > n {
        return Vec::new();
    }
    let span = n - win_len + 1;
    let mut lines = Vec::new();

    // Rows
    for r in 0..n {
        for c in 0..span {
            lines.push((0..win_len).map(|i| Position::new(r, c + i)).collect());
        }
    }
    // Columns
    for c in 0..n {
        for r in 0..span {
            lines.push((0..win_len).map(|i| Position::new(r + i, c)).collect());
        }
    }
    // Down-right diagonals
    for r in 0..span {
        for c in 0..span {
            lines.push((0..win_len).map(|i| Position::new(r + i, c + i)).collect());
        }
    }
    // Up-right diagonals
    for r in (win_len - 1)..n {
        for c in 0..span {
            lines.push((0..win_len).map(|i| Position::new(r - i, c + i)).collect());
        }
    }

    lines
}

/// Winning lines for one board size and win length, generated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinLines {
    size: BoardSize,
    win_len: usize,
    lines: Vec<Line>,
}

impl WinLines {
    /// Generates the lines for a board size and win length.
    pub fn new(size: BoardSize, win_len: usize) -> Self {
        Self {
            size,
            win_len,
            lines: winning_lines(size.get(), win_len),
        }
    }

    /// Board size the lines were generated for.
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Required run length.
    pub fn win_len(&self) -> usize {
        self.win_len
    }

    /// Lines in evaluation order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the first uniform, non-empty line and its owner.
    pub fn winner<'a>(&'a self, board: &Board) -> Option<(Player, &'a Line)> {
        self.lines.iter().find_map(|line| {
            let first = board.get(*line.first()?)?.player()?;
            line.iter()
                .all(|&pos| board.get(pos) == Some(Cell::Occupied(first)))
                .then_some((first, line))
        })
    }

    /// Evaluates the board: a winner, a draw, or `None` while play continues.
    #[instrument(skip_all, fields(size = %self.size, win_len = self.win_len))]
    pub fn evaluate(&self, board: &Board) -> Option<Outcome> {
        if let Some((player, line)) = self.winner(board) {
            return Some(Outcome::Winner {
                player,
                line: line.clone(),
            });
        }
        board.is_full().then_some(Outcome::Draw)
    }
}

/// Evaluates a board for a winner or draw with the given win length.
pub fn evaluate(board: &Board, win_len: usize) -> Option<Outcome> {
    WinLines::new(board.size(), win_len).evaluate(board)
}
