//! Alpha-beta minimax with move ordering, iterative deepening, and a
//! transposition cache.
//!
//! Scores are always expressed from a fixed `perspective` side: nodes where
//! that side moves maximise, the others minimise. A side with no legal move is
//! a leaf for that node; forced passes are left to the evaluator's horizon.
//!
//! # Example
//!
//! ```
//! use othello_rust::board::{Board, Side};
//! use othello_rust::eval::Evaluator;
//! use othello_rust::search::Searcher;
//!
//! let mut searcher = Searcher::new(Evaluator::default(), 1 << 16);
//! let result = searcher.search_fixed(&Board::opening(8), Side::Black, 3);
//! assert!(result.best_move.is_some());
//! ```

use crate::board::{Board, Side};
use crate::budget::Budget;
use crate::eval::Evaluator;
use crate::movegen::{Move, legal_moves};
use crate::tt::{Bound, CacheKey, TranspositionCache};

/// Infinity for alpha-beta windows.
pub const INF: i32 = i32::MAX;

/// Which search produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// No legal move; the caller must pass.
    Pass,
    FixedDepth,
    Iterative,
    Endgame,
    Mcts,
}

/// Result of a move search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen move; `None` means the side to move has to pass.
    pub best_move: Option<Move>,
    /// Evaluation of the chosen line from the mover's perspective, when the
    /// search produces one.
    pub score: Option<i32>,
    /// Deepest completed depth (empty cells for the endgame solver).
    pub depth: u32,
    /// Nodes (or playouts, for MCTS) visited.
    pub nodes: u64,
    pub kind: SearchKind,
    /// Wall time, filled in by [`crate::engine::Engine`].
    pub time_ms: u64,
}

impl SearchResult {
    pub fn pass() -> Self {
        Self {
            best_move: None,
            score: None,
            depth: 0,
            nodes: 0,
            kind: SearchKind::Pass,
            time_ms: 0,
        }
    }
}

/// Minimax searcher owning its evaluator and transposition cache.
pub struct Searcher {
    evaluator: Evaluator,
    cache: TranspositionCache,
    nodes: u64,
}

impl Searcher {
    pub fn new(evaluator: Evaluator, cache_capacity: usize) -> Self {
        Self {
            evaluator,
            cache: TranspositionCache::new(cache_capacity),
            nodes: 0,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Total nodes visited since creation.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Depth-limited alpha-beta.
    ///
    /// `to_move` moves at this node; the returned score is from
    /// `perspective`'s point of view.
    pub fn minimax(
        &mut self,
        board: &Board,
        to_move: Side,
        perspective: Side,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        let key = CacheKey::new(board, to_move, depth, perspective);
        if let Some(score) = self.cache.probe(&key, alpha, beta) {
            return score;
        }

        let moves = if depth == 0 {
            Vec::new()
        } else {
            legal_moves(board, to_move)
        };
        if moves.is_empty() {
            let score = self.evaluator.score(board, perspective);
            self.cache.store(key, score, Bound::Exact);
            return score;
        }

        let maximizing = to_move == perspective;
        let children = self.ordered_children(board, &moves, to_move, perspective, maximizing);

        let (alpha0, beta0) = (alpha, beta);
        let mut best = if maximizing { -INF } else { INF };
        for child in &children {
            let v = self.minimax(child, to_move.opponent(), perspective, depth - 1, alpha, beta);
            if maximizing {
                best = best.max(v);
                alpha = alpha.max(v);
            } else {
                best = best.min(v);
                beta = beta.min(v);
            }
            if beta <= alpha {
                break;
            }
        }

        let bound = if best <= alpha0 {
            Bound::Upper
        } else if best >= beta0 {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.store(key, best, bound);
        best
    }

    /// Child boards sorted by a one-ply estimate: best first for the side
    /// choosing at this node. The sort is stable, so equal estimates keep
    /// generation order.
    fn ordered_children(
        &self,
        board: &Board,
        moves: &[Move],
        to_move: Side,
        perspective: Side,
        maximizing: bool,
    ) -> Vec<Board> {
        let mut scored: Vec<(i32, Board)> = moves
            .iter()
            .map(|mv| {
                let next = board.after(mv, to_move);
                (self.evaluator.score(&next, perspective), next)
            })
            .collect();
        if maximizing {
            scored.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            scored.sort_by(|a, b| a.0.cmp(&b.0));
        }
        scored.into_iter().map(|(_, b)| b).collect()
    }

    /// Fixed-depth search from the root.
    ///
    /// Every root move is searched with a full window, so its score is exact.
    /// The strictly greatest score wins; ties keep the earliest move in
    /// row-major order. A depth of 0 is treated as 1.
    pub fn search_fixed(&mut self, board: &Board, side: Side, depth: u32) -> SearchResult {
        let depth = depth.max(1);
        let start_nodes = self.nodes;

        let mut best: Option<(Move, i32)> = None;
        for mv in legal_moves(board, side) {
            let next = board.after(&mv, side);
            let score = self.minimax(&next, side.opponent(), side, depth - 1, -INF, INF);
            if best.as_ref().is_none_or(|(_, s)| score > *s) {
                best = Some((mv, score));
            }
        }

        let Some((mv, score)) = best else {
            return SearchResult::pass();
        };
        SearchResult {
            best_move: Some(mv),
            score: Some(score),
            depth,
            nodes: self.nodes - start_nodes,
            kind: SearchKind::FixedDepth,
            time_ms: 0,
        }
    }

    /// Iterative deepening: fixed-depth passes at depth 1, 2, ... until the
    /// budget expires, `max_depth` is reached, or the depth exceeds the number
    /// of empty cells.
    ///
    /// The budget is polled only between passes and the first pass always
    /// runs. The result of the last completed pass is returned.
    pub fn search_iterative<B: Budget>(
        &mut self,
        board: &Board,
        side: Side,
        max_depth: u32,
        budget: &B,
    ) -> SearchResult {
        let limit = max_depth.min(board.empty_count() as u32).max(1);
        let start_nodes = self.nodes;
        let mut best = SearchResult::pass();

        for depth in 1..=limit {
            if depth > 1 && budget.expired() {
                log::debug!("iterative deepening: budget expired before depth {depth}");
                break;
            }
            let result = self.search_fixed(board, side, depth);
            if result.best_move.is_none() {
                return result;
            }
            log::debug!(
                "iterative deepening: depth {depth} -> {} score {:?} ({} nodes)",
                result.best_move.as_ref().map(|m| m.pos.to_string()).unwrap_or_default(),
                result.score,
                result.nodes
            );
            best = result;
        }

        best.kind = SearchKind::Iterative;
        best.nodes = self.nodes - start_nodes;
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::budget::Polls;
    use crate::eval::{Features, WeightTable};

    /// Plain minimax without pruning or caching, as a reference.
    fn reference_minimax(
        eval: &Evaluator,
        board: &Board,
        to_move: Side,
        perspective: Side,
        depth: u32,
    ) -> i32 {
        let moves = legal_moves(board, to_move);
        if depth == 0 || moves.is_empty() {
            return eval.score(board, perspective);
        }
        let values = moves.iter().map(|mv| {
            reference_minimax(
                eval,
                &board.after(mv, to_move),
                to_move.opponent(),
                perspective,
                depth - 1,
            )
        });
        if to_move == perspective {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    fn reference_root(eval: &Evaluator, board: &Board, side: Side, depth: u32) -> (Pos, i32) {
        let mut best: Option<(Pos, i32)> = None;
        for mv in legal_moves(board, side) {
            let v = reference_minimax(eval, &board.after(&mv, side), side.opponent(), side, depth - 1);
            if best.is_none_or(|(_, s)| v > s) {
                best = Some((mv.pos, v));
            }
        }
        best.unwrap()
    }

    /// Play a deterministic sequence of moves to reach a mid-game position.
    fn midgame(plies: usize, pick: usize) -> (Board, Side) {
        let mut board = Board::opening(8);
        let mut side = Side::Black;
        for i in 0..plies {
            let moves = legal_moves(&board, side);
            if !moves.is_empty() {
                let mv = &moves[(i * pick) % moves.len()];
                board.apply(mv, side);
            }
            side = side.opponent();
        }
        (board, side)
    }

    #[test]
    fn test_depth_zero_is_evaluator() {
        let eval = Evaluator::strategic();
        let mut searcher = Searcher::new(eval.clone(), 1024);
        let (board, side) = midgame(10, 3);
        for s in [side, side.opponent()] {
            assert_eq!(
                searcher.minimax(&board, s, s, 0, -INF, INF),
                eval.score(&board, s)
            );
        }
    }

    #[test]
    fn test_alpha_beta_matches_reference() {
        let evals = [
            Evaluator::default(),
            Evaluator::Positional {
                weights: WeightTable::default(),
            },
            Evaluator::Composite {
                weights: WeightTable::default(),
                features: Features::all(),
            },
        ];
        for eval in &evals {
            for (plies, pick) in [(8, 1), (12, 5), (17, 2)] {
                let (board, side) = midgame(plies, pick);
                let (pos, score) = reference_root(eval, &board, side, 3);
                let mut searcher = Searcher::new(eval.clone(), 1 << 16);
                let result = searcher.search_fixed(&board, side, 3);
                assert_eq!(result.best_move.map(|m| m.pos), Some(pos));
                assert_eq!(result.score, Some(score));
            }
        }
    }

    #[test]
    fn test_cache_reuse_keeps_results() {
        let (board, side) = midgame(12, 5);
        let mut searcher = Searcher::new(Evaluator::strategic(), 1 << 16);
        let first = searcher.search_fixed(&board, side, 4);
        let second = searcher.search_fixed(&board, side, 4);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert!(second.nodes <= first.nodes);
        assert!(searcher.cache().stats().hits > 0);
    }

    #[test]
    fn test_tiny_cache_still_correct() {
        let eval = Evaluator::default();
        let (board, side) = midgame(12, 5);
        let (pos, score) = reference_root(&eval, &board, side, 3);
        let mut searcher = Searcher::new(eval, 8);
        let result = searcher.search_fixed(&board, side, 3);
        assert_eq!(result.best_move.map(|m| m.pos), Some(pos));
        assert_eq!(result.score, Some(score));
        assert!(searcher.cache().len() <= 8);
    }

    #[test]
    fn test_ties_favor_first_generated_move() {
        // Every opening move is symmetric for material at depth 1.
        let mut searcher = Searcher::new(Evaluator::Material { corner_bonus: None }, 1024);
        let result = searcher.search_fixed(&Board::opening(8), Side::Black, 1);
        assert_eq!(result.best_move.unwrap().pos, Pos::new(2, 3));
        assert_eq!(result.score, Some(3));
    }

    #[test]
    fn test_no_moves_is_pass() {
        let board: Board = "
            X X X X
            X X X X
            X X X X
            X X X .
        "
        .parse()
        .unwrap();
        let mut searcher = Searcher::new(Evaluator::default(), 1024);
        let result = searcher.search_fixed(&board, Side::White, 3);
        assert!(result.best_move.is_none());
        assert_eq!(result.kind, SearchKind::Pass);
    }

    #[test]
    fn test_iterative_stops_on_budget() {
        let (board, side) = midgame(10, 3);
        let mut searcher = Searcher::new(Evaluator::strategic(), 1 << 16);
        let result = searcher.search_iterative(&board, side, 10, &Polls::new(2));
        assert_eq!(result.depth, 3);
        assert_eq!(result.kind, SearchKind::Iterative);

        let mut fresh = Searcher::new(Evaluator::strategic(), 1 << 16);
        let fixed = fresh.search_fixed(&board, side, 3);
        assert_eq!(result.best_move, fixed.best_move);
        assert_eq!(result.score, fixed.score);
    }

    #[test]
    fn test_iterative_first_pass_always_runs() {
        let (board, side) = midgame(6, 1);
        let mut searcher = Searcher::new(Evaluator::default(), 1024);
        let result = searcher.search_iterative(&board, side, 10, &Polls::new(0));
        assert_eq!(result.depth, 1);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn test_iterative_capped_by_empty_cells() {
        let board: Board = "
            X O O .
            X O X X
            X X O X
            X X X X
        "
        .parse()
        .unwrap();
        let mut searcher = Searcher::new(Evaluator::default(), 1024);
        let result = searcher.search_iterative(&board, Side::Black, 10, &crate::budget::Unlimited);
        assert_eq!(result.depth, 1);
        assert_eq!(result.best_move.unwrap().pos, Pos::new(0, 3));
    }
}
