//! Depth-limited minimax opponent.
//!
//! The search alternates strictly between the two players and ignores
//! power cells. Terminal positions score `WIN_SCORE - depth` for an AI win
//! and `-WIN_SCORE + depth` for a loss, so faster wins and slower losses are
//! preferred. Past the depth limit a line-potential heuristic takes over.
//!
//! The search is exhaustive up to the limit: cost grows as roughly
//! `(empty cells)^depth`. A depth of 6 on an empty 5×5 board is already far
//! too slow for interactive play; callers choose the depth.

use crate::rules::WinLines;
use crate::types::{Board, Cell, Player, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Score of a won position before the depth adjustment.
pub const WIN_SCORE: i32 = 1000;

const UNSEEN: i32 = 1_000_000_000;

/// Result of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best move found, `None` when the root is already terminal.
    pub best: Option<Position>,
    /// Minimax value of the root.
    pub score: i32,
    /// Positions visited.
    pub nodes: u64,
}

/// Minimax search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minimax {
    depth_limit: usize,
}

impl Minimax {
    /// Creates a searcher that looks `depth_limit` plies ahead.
    pub fn new(depth_limit: usize) -> Self {
        Self { depth_limit }
    }

    /// Plies searched before the heuristic takes over.
    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    /// Searches for the AI's best move. The caller's board is not touched.
    #[instrument(skip(self, board, lines), fields(depth_limit = self.depth_limit))]
    pub fn search(&self, board: &Board, lines: &WinLines, ai: Player, human: Player) -> SearchResult {
        let mut scratch = board.clone();
        let mut search = Search {
            lines,
            ai,
            human,
            depth_limit: self.depth_limit,
            nodes: 0,
        };
        let (score, best) = search.minimax(&mut scratch, 0, true);
        debug!(?best, score, nodes = search.nodes, "Search finished");
        SearchResult {
            best,
            score,
            nodes: search.nodes,
        }
    }

    /// Best move for `ai`, or a random available move when the search finds none.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        board: &Board,
        lines: &WinLines,
        ai: Player,
        human: Player,
        rng: &mut R,
    ) -> Option<Position> {
        self.search(board, lines, ai, human).best.or_else(|| {
            let fallback = board.available_moves().choose(rng).copied();
            debug!(?fallback, "Search found no move, picking at random");
            fallback
        })
    }
}

struct Search<'a> {
    lines: &'a WinLines,
    ai: Player,
    human: Player,
    depth_limit: usize,
    nodes: u64,
}

impl Search<'_> {
    fn minimax(&mut self, board: &mut Board, depth: usize, maximizing: bool) -> (i32, Option<Position>) {
        self.nodes += 1;
        let plies = depth as i32;

        if let Some((winner, _)) = self.lines.winner(board) {
            if winner == self.ai {
                return (WIN_SCORE - plies, None);
            }
            if winner == self.human {
                return (-WIN_SCORE + plies, None);
            }
        }
        if board.is_full() {
            return (0, None);
        }
        if depth >= self.depth_limit {
            return (heuristic(board, self.lines, self.ai, self.human), None);
        }

        let (mark, mut best) = if maximizing {
            (self.ai, -UNSEEN)
        } else {
            (self.human, UNSEEN)
        };
        let mut best_move = None;

        for pos in board.available_moves() {
            board.put(pos, Cell::Occupied(mark));
            let (score, _) = self.minimax(board, depth + 1, !maximizing);
            board.put(pos, Cell::Empty);

            let better = if maximizing { score > best } else { score < best };
            if better {
                best = score;
                best_move = Some(pos);
            }
        }

        (best, best_move)
    }
}

/// Line-potential score of a position from `ai`'s point of view.
///
/// Every line free of the opponent's marks is worth `own marks + 1` to a
/// player; the score is the AI's total minus the human's.
pub fn heuristic(board: &Board, lines: &WinLines, ai: Player, human: Player) -> i32 {
    potential(board, lines, ai, human) - potential(board, lines, human, ai)
}

fn potential(board: &Board, lines: &WinLines, player: Player, opponent: Player) -> i32 {
    lines
        .lines()
        .iter()
        .filter_map(|line| {
            let mut own = 0;
            for &pos in line {
                match board.get(pos)?.player() {
                    Some(p) if p == opponent => return None,
                    Some(p) if p == player => own += 1,
                    _ => {}
                }
            }
            Some(own + 1)
        })
        .sum()
}

/// Picks the AI's move with depth-limited minimax.
///
/// Deterministic for a given board and depth; the thread RNG is only used
/// when the search yields no move (the board already has a winner).
/// Returns `None` only when the board is full.
pub fn choose_move(
    board: &Board,
    win_len: usize,
    depth_limit: usize,
    ai: Player,
    human: Player,
) -> Option<Position> {
    choose_move_with_rng(board, win_len, depth_limit, ai, human, &mut rand::thread_rng())
}

/// [`choose_move`] with a caller-supplied RNG for the fallback.
pub fn choose_move_with_rng<R: Rng + ?Sized>(
    board: &Board,
    win_len: usize,
    depth_limit: usize,
    ai: Player,
    human: Player,
    rng: &mut R,
) -> Option<Position> {
    let lines = WinLines::new(board.size(), win_len);
    Minimax::new(depth_limit).choose(board, &lines, ai, human, rng)
}
