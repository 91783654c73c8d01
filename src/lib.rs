//! Othello-Rust: an Othello (Reversi) search engine.
//!
//! This crate provides the board model, move generation, evaluation and
//! several move searches for Othello: alpha-beta minimax with a transposition
//! cache, iterative deepening under a time budget, an exact endgame solver,
//! and flat Monte Carlo search with UCT selection.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, weights and engine parameters
//! - [`board`] - Board state, sides, coordinates and text parsing
//! - [`movegen`] - Legal moves and flips
//! - [`eval`] - Static evaluators
//! - [`search`] - Alpha-beta minimax and iterative deepening
//! - [`tt`] - Transposition cache
//! - [`endgame`] - Exact endgame solver
//! - [`playout`] - Random game simulation
//! - [`mcts`] - Flat UCT search
//! - [`budget`] - Time and poll budgets
//! - [`config`] - Search configuration and opponent levels
//! - [`engine`] - Move selection across all searches
//! - [`game`] - Game session and turn handling
//!
//! ## Example
//!
//! ```
//! use othello_rust::board::{Board, Side};
//! use othello_rust::config::SearchConfig;
//! use othello_rust::engine::Engine;
//!
//! let mut engine = Engine::new(SearchConfig::level(3));
//! let result = engine.choose_move(&Board::opening(8), Side::Black);
//! println!("Best move: {}", result.best_move.unwrap());
//! ```

pub mod board;
pub mod budget;
pub mod config;
pub mod constants;
pub mod endgame;
pub mod engine;
pub mod eval;
pub mod game;
pub mod mcts;
pub mod movegen;
pub mod playout;
pub mod search;
pub mod tt;

pub use board::{Board, Pos, Side};
pub use config::SearchConfig;
pub use engine::Engine;
pub use game::Game;
pub use movegen::Move;
pub use search::SearchResult;
