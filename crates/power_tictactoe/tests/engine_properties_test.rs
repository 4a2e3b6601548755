//! Property-based tests for the move engine and the AI.

use power_tictactoe::{
    Board, BoardSize, Cell, GameMode, GameState, Player, Position, Settings, choose_move,
    evaluate, winning_lines,
};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn arb_size() -> impl Strategy<Value = BoardSize> {
    prop::sample::select(BoardSize::iter().collect::<Vec<_>>())
}

/// Settings for a local game with a legal win length and power cells on.
fn arb_settings() -> impl Strategy<Value = Settings> {
    arb_size().prop_flat_map(|size| {
        let n = size.get();
        (3..=n, 0..=n, 1usize..=2, any::<bool>()).prop_map(
            move |(win_len, cells, threshold, swap)| {
                Settings::default()
                    .with_mode(GameMode::HumanVsHuman)
                    .with_size(size)
                    .with_win_len(win_len)
                    .with_power_cells_count(cells)
                    .with_swap_after_moves_each(threshold)
                    .with_swap_rule_enabled(swap)
            },
        )
    })
}

/// A game reached by legal play from a fresh start.
fn arb_game() -> impl Strategy<Value = GameState> {
    (arb_settings(), proptest::collection::vec(0usize..64, 0..25)).prop_map(
        |(settings, picks)| {
            let mut game = GameState::new(settings).unwrap();
            for pick in picks {
                let moves = game.available_moves();
                if game.is_over() || moves.is_empty() {
                    break;
                }
                let player = game.turn();
                game.apply_move(moves[pick % moves.len()], player).unwrap();
            }
            game
        },
    )
}

/// An arbitrary filled-in board, not necessarily reachable.
fn arb_board() -> impl Strategy<Value = Board> {
    arb_size().prop_flat_map(|size| {
        proptest::collection::vec(0u8..3, size.cell_count()).prop_map(move |marks| {
            let mut board = Board::new(size);
            let positions: Vec<_> = board.positions().collect();
            for (pos, mark) in positions.into_iter().zip(marks) {
                let cell = match mark {
                    1 => Cell::Occupied(Player::X),
                    2 => Cell::Occupied(Player::O),
                    _ => Cell::Empty,
                };
                board.set(pos, cell).unwrap();
            }
            board
        })
    })
}

proptest! {
    #[test]
    fn prop_illegal_move_leaves_state_untouched(
        game in arb_game(),
        row in 0usize..6,
        col in 0usize..6,
        as_x in any::<bool>(),
    ) {
        let mut game = game;
        let before = game.clone();
        let player = if as_x { Player::X } else { Player::O };
        if game.apply_move(Position::new(row, col), player).is_err() {
            prop_assert_eq!(game, before);
        }
    }

    #[test]
    fn prop_apply_then_undo_restores(game in arb_game(), pick in 0usize..64) {
        let mut game = game;
        let moves = game.available_moves();
        prop_assume!(!game.is_over() && !moves.is_empty());

        let before = game.clone();
        let player = game.turn();
        game.apply_move(moves[pick % moves.len()], player).unwrap();
        let _ = game.swap_symbols();
        game.undo().unwrap();
        prop_assert_eq!(game, before);
    }

    #[test]
    fn prop_history_matches_board(game in arb_game()) {
        prop_assert_eq!(game.history().len(), game.board().occupied_count());
        for mov in game.history() {
            prop_assert_eq!(game.board().get(mov.position), Some(Cell::Occupied(mov.player)));
        }
        for &pos in game.power_cells().as_slice() {
            prop_assert!(game.board().is_empty(pos));
        }
    }

    #[test]
    fn prop_draw_iff_full_without_line(board in arb_board(), win_len in 3usize..=5) {
        let n = board.dimension();
        prop_assume!(win_len <= n);

        let has_line = winning_lines(n, win_len).iter().any(|line| {
            let first = board.get(line[0]).and_then(Cell::player);
            first.is_some()
                && line.iter().all(|&p| board.get(p).and_then(Cell::player) == first)
        });
        let outcome = evaluate(&board, win_len);
        let is_draw = outcome.as_ref().is_some_and(|o| o.is_draw());
        prop_assert_eq!(is_draw, board.is_full() && !has_line);
        prop_assert_eq!(outcome.as_ref().and_then(|o| o.winner()).is_some(), has_line);
    }

    #[test]
    fn prop_minimax_deterministic(game in arb_game(), depth in 1usize..=2) {
        let board = game.board();
        let win_len = *game.settings().win_len();
        let first = choose_move(board, win_len, depth, Player::O, Player::X);
        let second = choose_move(board, win_len, depth, Player::O, Player::X);
        if !game.is_over() {
            prop_assert_eq!(first, second);
        }
        if let Some(pos) = first {
            prop_assert!(board.is_empty(pos));
        }
    }
}
