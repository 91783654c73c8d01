//! Constants for board geometry, evaluation defaults, and search parameters.
//!
//! Every tunable number the engine uses lives here so that opponent levels
//! and JSON configurations have one place to draw their defaults from.
//! The board itself is size-parametric; [`SIZE`] is only the standard size
//! used by [`crate::game::Game::default`] and the opponent presets.

// =============================================================================
// Board Geometry
// =============================================================================

/// Standard board size (NxN).
pub const SIZE: usize = 8;

/// Smallest board with a centre 2x2.
pub const MIN_SIZE: usize = 2;

/// Largest board whose columns can be labelled `a` to `z`.
pub const MAX_SIZE: usize = 26;

/// The eight ray directions as (row, col) steps.
/// Order: N, S, W, E, NW, SE, NE, SW
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

// =============================================================================
// Evaluation Defaults
// =============================================================================

/// Bonus per owned corner in the material evaluator.
pub const MATERIAL_CORNER_BONUS: i32 = 5;

/// Positional weights for the standard 8x8 board.
pub const DEFAULT_WEIGHTS: [[i32; SIZE]; SIZE] = [
    [100, -25, 10, 5, 5, 10, -25, 100],
    [-25, -50, 1, 1, 1, 1, -50, -25],
    [10, 1, 3, 2, 2, 3, 1, 10],
    [5, 1, 2, 1, 1, 2, 1, 5],
    [5, 1, 2, 1, 1, 2, 1, 5],
    [10, 1, 3, 2, 2, 3, 1, 10],
    [-25, -50, 1, 1, 1, 1, -50, -25],
    [100, -25, 10, 5, 5, 10, -25, 100],
];

/// Weights used when synthesising a table for non-standard sizes.
pub const WEIGHT_CORNER: i32 = 100;
pub const WEIGHT_C_SQUARE: i32 = -25;
pub const WEIGHT_X_SQUARE: i32 = -50;
pub const WEIGHT_EDGE: i32 = 10;
pub const WEIGHT_INNER: i32 = 1;

/// Bonus per stable stone.
pub const STABLE_BONUS: i32 = 4;

/// Parity bonus, applied once few empty cells remain.
pub const PARITY_BONUS: i32 = 3;

/// Parity is only considered at or below this many empty cells.
pub const PARITY_THRESHOLD: usize = 16;

/// Penalty for occupying an X-square (diagonal neighbour of a corner).
pub const X_SQUARE_PENALTY: i32 = 20;

/// Penalty for occupying a cell of the corner-trap zone.
pub const CORNER_TRAP_PENALTY: i32 = 20;

// =============================================================================
// Search Parameters
// =============================================================================

/// Depth used when no configuration provides one.
pub const DEFAULT_DEPTH: u32 = 1;

/// Depth used when a dynamic depth table has no matching row.
pub const DYNAMIC_FALLBACK_DEPTH: u32 = 2;

/// Hard cap on iterative deepening.
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Default iterative deepening / MCTS wall-clock budget in milliseconds.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 1000;

/// Empty-cell count at or below which the exact endgame solver takes over.
pub const ENDGAME_MAX_EMPTY: usize = 12;

/// Maximum number of transposition cache entries before the cache is cleared.
pub const CACHE_CAPACITY: usize = 1 << 20;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of playouts per root move.
pub const MCTS_SIMULATIONS: usize = 100;

/// Default UCT exploration constant (about sqrt(2)).
pub const MCTS_EXPLORATION: f64 = 1.41;

/// Seed used when the caller does not supply one.
pub const MCTS_SEED: u64 = 0x5eed_0f_07e1;
