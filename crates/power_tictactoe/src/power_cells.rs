//! Power cells: positions that grant the mover an extra turn.

use crate::types::{BoardSize, Position};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Seed offset; the layout for an `n`×`n` board is seeded with `POWER_CELL_SEED + n`.
pub const POWER_CELL_SEED: u64 = 42;

/// Picks `count` distinct power cells for a board size.
///
/// The layout depends only on the board size, so every reset of a game
/// with the same size gets the same cells. Counts above the cell total are
/// truncated to the whole board.
#[instrument]
pub fn generate_power_cells(size: BoardSize, count: usize) -> Vec<Position> {
    let n = size.get();
    let mut cells: Vec<Position> = (0..n)
        .flat_map(|r| (0..n).map(move |c| Position::new(r, c)))
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(POWER_CELL_SEED + n as u64);
    cells.shuffle(&mut rng);
    cells.truncate(count);
    debug!(?cells, "Generated power cells");
    cells
}

/// Unused power cells, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerCells {
    cells: Vec<Position>,
}

impl PowerCells {
    /// The deterministic layout for a board size.
    pub fn generate(size: BoardSize, count: usize) -> Self {
        Self {
            cells: generate_power_cells(size, count),
        }
    }

    /// True if the position is an unused power cell.
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Consumes a power cell. Returns false if it was not one.
    pub fn consume(&mut self, pos: Position) -> bool {
        match self.cells.iter().position(|&p| p == pos) {
            Some(i) => {
                self.cells.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remaining cells.
    pub fn as_slice(&self) -> &[Position] {
        &self.cells
    }

    /// Number of remaining cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when every power cell has been used.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Position> for PowerCells {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut cells: Vec<Position> = Vec::new();
        for pos in iter {
            if !cells.contains(&pos) {
                cells.push(pos);
            }
        }
        Self { cells }
    }
}
