//! Core domain types for power tic-tac-toe.

use crate::error::{MoveError, SettingsError};
use crate::settings::DisplaySymbols;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};
use tracing::instrument;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Player {
    /// Player X.
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a player's mark.
    Occupied(Player),
}

impl Cell {
    /// Returns the player occupying this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// True for [`Cell::Empty`].
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Supported board edge lengths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "usize", into = "usize")]
pub enum BoardSize {
    /// 3×3 board.
    #[default]
    Three,
    /// 4×4 board.
    Four,
    /// 5×5 board.
    Five,
}

impl BoardSize {
    /// Edge length of the board.
    pub fn get(self) -> usize {
        match self {
            BoardSize::Three => 3,
            BoardSize::Four => 4,
            BoardSize::Five => 5,
        }
    }

    /// Number of cells on the board.
    pub fn cell_count(self) -> usize {
        self.get() * self.get()
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = SettingsError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            3 => Ok(BoardSize::Three),
            4 => Ok(BoardSize::Four),
            5 => Ok(BoardSize::Five),
            other => Err(SettingsError::UnsupportedSize(other)),
        }
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> Self {
        size.get()
    }
}

impl std::fmt::Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}×{0}", self.get())
    }
}

/// A zero-based board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row index, counted from the top.
    pub row: usize,
    /// Column index, counted from the left.
    pub col: usize,
}

impl Position {
    /// Creates a position from zero-based row and column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}, col {}", self.row + 1, self.col + 1)
    }
}

/// N×N board, cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a new empty board.
    #[instrument]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.cell_count()],
        }
    }

    /// Creates an empty board from a raw edge length.
    pub fn with_dimension(n: usize) -> Result<Self, SettingsError> {
        Ok(Self::new(BoardSize::try_from(n)?))
    }

    /// Returns the board size.
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Edge length of the board.
    pub fn dimension(&self) -> usize {
        self.size.get()
    }

    /// True if the position lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.dimension() && pos.col < self.dimension()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row * self.dimension() + pos.col)
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Sets the cell at the given position, returning what was there.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<Cell, MoveError> {
        let i = self.index(pos).ok_or(MoveError::OutOfBounds(pos))?;
        Ok(std::mem::replace(&mut self.cells[i], cell))
    }

    /// Writes a cell the caller already knows to be on the board.
    pub(crate) fn put(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Checks if a cell is on the board and empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// True iff no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let n = self.dimension();
        (0..n).flat_map(move |row| (0..n).map(move |col| Position::new(row, col)))
    }

    /// Empty positions in row-major order.
    pub fn available_moves(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Number of cells holding the player's mark.
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Occupied(player))
            .count()
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Cells of one row, left to right.
    pub fn row(&self, row: usize) -> &[Cell] {
        let n = self.dimension();
        if row >= n {
            return &[];
        }
        &self.cells[row * n..(row + 1) * n]
    }

    /// Renders the board as text, one row per line, `.` for empty cells.
    pub fn render(&self, mut symbol: impl FnMut(Player) -> String) -> String {
        (0..self.dimension())
            .map(|r| {
                self.row(r)
                    .iter()
                    .map(|cell| match cell.player() {
                        Some(p) => symbol(p),
                        None => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the board with display symbols in place of the letters.
    pub fn render_with(&self, symbols: &DisplaySymbols) -> String {
        self.render(|p| symbols.symbol(p).to_string())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardSize::default())
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(|p| p.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(BoardSize::Four);
        assert_eq!(board.dimension(), 4);
        assert_eq!(board.available_moves().len(), 16);
        assert!(!board.is_full());
    }

    #[test]
    fn test_available_moves_row_major() {
        let mut board = Board::new(BoardSize::Three);
        board.set(Position::new(0, 1), Cell::Occupied(Player::X)).unwrap();
        let moves = board.available_moves();
        assert_eq!(moves[0], Position::new(0, 0));
        assert_eq!(moves[1], Position::new(0, 2));
        assert_eq!(moves[2], Position::new(1, 0));
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new(BoardSize::Three);
        let result = board.set(Position::new(3, 0), Cell::Occupied(Player::O));
        assert_eq!(result, Err(MoveError::OutOfBounds(Position::new(3, 0))));
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new(BoardSize::Three);
        for pos in board.available_moves() {
            board.set(pos, Cell::Occupied(Player::X)).unwrap();
        }
        assert!(board.is_full());
        assert!(board.available_moves().is_empty());
        assert_eq!(board.count(Player::X), 9);
    }

    #[test]
    fn test_with_dimension_rejects_unsupported() {
        assert!(Board::with_dimension(5).is_ok());
        assert_eq!(
            Board::with_dimension(6),
            Err(SettingsError::UnsupportedSize(6))
        );
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(BoardSize::Three);
        board.set(Position::new(0, 0), Cell::Occupied(Player::X)).unwrap();
        board.set(Position::new(1, 1), Cell::Occupied(Player::O)).unwrap();
        assert_eq!(board.to_string(), "X . .\n. O .\n. . .");
    }

    #[test]
    fn test_render_with_symbols() {
        let mut board = Board::new(BoardSize::Three);
        board.set(Position::new(2, 0), Cell::Occupied(Player::O)).unwrap();
        let symbols = DisplaySymbols::new("#", "@");
        assert_eq!(board.render_with(&symbols), ". . .\n. . .\n@ . .");
    }

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(Position::new(0, 2).to_string(), "row 1, col 3");
    }

    #[test]
    fn test_player_from_str() {
        assert_eq!("x".parse::<Player>().unwrap(), Player::X);
        assert_eq!("O".parse::<Player>().unwrap(), Player::O);
        assert!("z".parse::<Player>().is_err());
    }
}
