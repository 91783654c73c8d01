//! Exact endgame solver.
//!
//! Searches to the end of the game in negamax form: a node's value is the
//! final stone differential from the side to move's point of view. A side
//! with no move passes without consuming a ply; when neither side can move
//! the node is terminal.
//!
//! The solver is only tractable with few empty cells; the engine calls it at
//! or below [`crate::config::EndgameParams::max_empty`].

use crate::board::{Board, Side};
use crate::movegen::{Move, has_legal_move, legal_moves};
use crate::search::{SearchKind, SearchResult};

pub struct EndgameSolver {
    /// Stop expanding siblings once the maximum margin is reached.
    use_pruning: bool,
    nodes: u64,
}

impl EndgameSolver {
    pub fn new(use_pruning: bool) -> Self {
        Self {
            use_pruning,
            nodes: 0,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Exact final stone differential for `to_move`, assuming best play.
    pub fn solve(&mut self, board: &Board, to_move: Side) -> i32 {
        let inf = board.area() as i32 + 1;
        self.negamax(board, to_move, -inf, inf)
    }

    /// Exact value of the position expressed from `perspective`.
    pub fn exact_score(&mut self, board: &Board, to_move: Side, perspective: Side) -> i32 {
        let v = self.solve(board, to_move);
        if to_move == perspective { v } else { -v }
    }

    /// Fail-soft negamax. With the full window used by [`Self::solve`] the
    /// result is exact; the window only skips lines that cannot change it.
    fn negamax(&mut self, board: &Board, to_move: Side, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        let opp = to_move.opponent();

        let moves = legal_moves(board, to_move);
        if moves.is_empty() {
            if !has_legal_move(board, opp) {
                return board.disc_diff(to_move);
            }
            return -self.negamax(board, opp, -beta, -alpha);
        }

        let max_margin = board.area() as i32;
        let mut best = -max_margin - 1;
        for mv in &moves {
            let v = -self.negamax(&board.after(mv, to_move), opp, -beta, -alpha);
            best = best.max(v);
            alpha = alpha.max(v);
            if alpha >= beta || (self.use_pruning && best >= max_margin) {
                break;
            }
        }
        best
    }

    /// Pick the move with the best exact outcome. Ties keep the earliest move.
    pub fn best_move(&mut self, board: &Board, side: Side) -> SearchResult {
        let start_nodes = self.nodes;
        let mut best: Option<(Move, i32)> = None;
        for mv in legal_moves(board, side) {
            let v = -self.solve(&board.after(&mv, side), side.opponent());
            if best.as_ref().is_none_or(|(_, s)| v > *s) {
                best = Some((mv, v));
            }
        }

        let Some((mv, score)) = best else {
            return SearchResult::pass();
        };
        SearchResult {
            best_move: Some(mv),
            score: Some(score),
            depth: board.empty_count() as u32,
            nodes: self.nodes - start_nodes,
            kind: SearchKind::Endgame,
            time_ms: 0,
        }
    }
}
