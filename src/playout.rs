//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves until neither side can move.
//! A side with no move passes; two consecutive passes end the game.

use fastrand::Rng;

use crate::board::{Board, Side};
use crate::eval::Evaluator;
use crate::movegen::legal_moves;

/// Play random moves from `board` with `to_move` to move until the game
/// ends, returning the final board.
pub fn random_playout(board: &Board, to_move: Side, rng: &mut Rng) -> Board {
    let mut board = board.clone();
    let mut side = to_move;
    let mut passes = 0;

    while passes < 2 {
        let moves = legal_moves(&board, side);
        if moves.is_empty() {
            passes += 1;
        } else {
            passes = 0;
            let mv = &moves[rng.usize(..moves.len())];
            board.apply(mv, side);
        }
        side = side.opponent();
    }

    board
}

/// Run one playout and score the final board for `perspective`:
/// +1 win, 0 draw, -1 loss, according to the sign of the evaluator.
pub fn playout_result(
    board: &Board,
    to_move: Side,
    perspective: Side,
    evaluator: &Evaluator,
    rng: &mut Rng,
) -> i32 {
    let end = random_playout(board, to_move, rng);
    evaluator.score(&end, perspective).signum()
}
