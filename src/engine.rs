//! Move selection front door.
//!
//! [`Engine::choose_move`] picks the search for a position:
//!
//! 1. **Pass**: the side to move has no legal move
//! 2. **Endgame**: the exact solver, when enabled and few cells are empty
//! 3. **Fixed depth**: alpha-beta at the configured (or dynamic) depth
//! 4. **Iterative**: iterative deepening under the time limit
//! 5. **MCTS**: flat UCT under the playout and time limits
//!
//! # Example
//!
//! ```
//! use othello_rust::config::SearchConfig;
//! use othello_rust::engine::Engine;
//! use othello_rust::game::Game;
//!
//! let mut engine = Engine::new(SearchConfig::level(2));
//! let mut game = Game::default();
//! let result = engine.choose_move(game.board(), game.to_move());
//! if let Some(mv) = &result.best_move {
//!     game.play(mv).unwrap();
//! }
//! ```

use std::time::Instant;

use crate::board::{Board, Side};
use crate::budget::Deadline;
use crate::config::{Algorithm, SearchConfig};
use crate::endgame::EndgameSolver;
use crate::mcts::uct_search;
use crate::movegen::has_legal_move;
use crate::search::{SearchResult, Searcher};

pub struct Engine {
    config: SearchConfig,
    searcher: Searcher,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        let searcher = Searcher::new(config.evaluator.clone(), config.cache_capacity);
        Self { config, searcher }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the configuration. Cached scores depend on the evaluator, so
    /// the cache starts empty.
    pub fn set_config(&mut self, config: SearchConfig) {
        *self = Self::new(config);
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.searcher.clear_cache();
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Choose a move for `side`. The board is only read.
    pub fn choose_move(&mut self, board: &Board, side: Side) -> SearchResult {
        let start = Instant::now();

        if !has_legal_move(board, side) {
            log::debug!("{side} has no legal move");
            return SearchResult::pass();
        }

        let empty = board.empty_count();
        let mut result = match self.config.endgame {
            Some(params) if empty <= params.max_empty => {
                log::debug!("endgame solver with {empty} empty cells");
                EndgameSolver::new(params.use_pruning).best_move(board, side)
            }
            _ => match self.config.algorithm {
                Algorithm::FixedDepth => {
                    let depth = self.config.depth_for(empty);
                    self.searcher.search_fixed(board, side, depth)
                }
                Algorithm::Iterative => {
                    let deadline = Deadline::after(self.config.time_limit);
                    self.searcher
                        .search_iterative(board, side, self.config.max_depth, &deadline)
                }
                Algorithm::Mcts => {
                    let deadline = Deadline::after(self.config.time_limit);
                    uct_search(board, side, &self.config.evaluator, &self.config.mcts, &deadline)
                }
            },
        };

        result.time_ms = start.elapsed().as_millis() as u64;
        if let Some(mv) = &result.best_move {
            log::info!(
                "{side}: {} via {:?} (score {:?}, depth {}, {} nodes, {}ms, cache {:.1}% hits)",
                mv.pos,
                result.kind,
                result.score,
                result.depth,
                result.nodes,
                result.time_ms,
                self.searcher.cache().stats().hit_rate()
            );
        }
        result
    }
}
