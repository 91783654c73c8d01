//! Static evaluation of board positions.
//!
//! Every strategy is a pure function of `(board, side)` plus its own
//! parameters, returning a signed score where positive favours `side`.
//!
//! - [`Evaluator::Material`] - stone difference with an optional corner bonus
//! - [`Evaluator::Positional`] - weighted sum over a per-cell table
//! - [`Evaluator::Composite`] - positional plus the optional [`Features`] terms

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Side};
use crate::constants::{
    CORNER_TRAP_PENALTY, DEFAULT_WEIGHTS, DIRECTIONS, MATERIAL_CORNER_BONUS, PARITY_BONUS,
    PARITY_THRESHOLD, SIZE, STABLE_BONUS, WEIGHT_CORNER, WEIGHT_C_SQUARE, WEIGHT_EDGE,
    WEIGHT_INNER, WEIGHT_X_SQUARE, X_SQUARE_PENALTY,
};

/// Per-cell weights for the positional evaluators, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(Vec<Vec<i32>>);

impl WeightTable {
    /// The default table for a board of the given size.
    ///
    /// The standard size uses the hand-tuned table; other sizes get a table
    /// with the same shape: strong corners, negative cells next to corners,
    /// mildly positive edges.
    pub fn standard(size: usize) -> Self {
        if size == SIZE {
            return Self(DEFAULT_WEIGHTS.iter().map(|row| row.to_vec()).collect());
        }
        let m = size - 1;
        let near = |i: usize| i == 1 || i + 1 == m;
        let edge = |i: usize| i == 0 || i == m;
        let rows = (0..size)
            .map(|r| {
                (0..size)
                    .map(|c| match (edge(r), edge(c), near(r), near(c)) {
                        (true, true, _, _) => WEIGHT_CORNER,
                        (false, false, true, true) => WEIGHT_X_SQUARE,
                        (true, _, _, true) | (_, true, true, _) => WEIGHT_C_SQUARE,
                        (true, _, _, _) | (_, true, _, _) => WEIGHT_EDGE,
                        _ => WEIGHT_INNER,
                    })
                    .collect()
            })
            .collect();
        Self(rows)
    }

    pub fn from_rows(rows: Vec<Vec<i32>>) -> Self {
        Self(rows)
    }

    /// Size of the table if it is square, `None` otherwise.
    pub fn size(&self) -> Option<usize> {
        let n = self.0.len();
        self.0.iter().all(|row| row.len() == n).then_some(n)
    }

    #[inline]
    pub fn weight(&self, pos: Pos) -> i32 {
        self.0[pos.row][pos.col]
    }

    fn fits(&self, board: &Board) -> bool {
        self.size() == Some(board.size())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard(SIZE)
    }
}

/// Optional additive terms of the composite evaluator.
///
/// A term set to `None` is skipped entirely, not evaluated with zero weight.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Bonus per stable stone (subtracted for opponent stable stones).
    pub stable_bonus: Option<i32>,
    /// Bonus for the side leading in stones once few cells remain.
    pub parity_bonus: Option<i32>,
    /// Penalty for own stones on X-squares (bonus for opponent ones).
    pub x_square_penalty: Option<i32>,
    /// Penalty for own stones in the corner-trap zone (bonus for opponent ones).
    pub corner_trap_penalty: Option<i32>,
}

impl Features {
    /// Every term enabled at its default magnitude.
    pub fn all() -> Self {
        Self {
            stable_bonus: Some(STABLE_BONUS),
            parity_bonus: Some(PARITY_BONUS),
            x_square_penalty: Some(X_SQUARE_PENALTY),
            corner_trap_penalty: Some(CORNER_TRAP_PENALTY),
        }
    }
}

/// Evaluation strategy, each variant carrying its own parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evaluator {
    Material {
        #[serde(default)]
        corner_bonus: Option<i32>,
    },
    Positional {
        #[serde(default)]
        weights: WeightTable,
    },
    Composite {
        #[serde(default)]
        weights: WeightTable,
        #[serde(default)]
        features: Features,
    },
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::Material {
            corner_bonus: Some(MATERIAL_CORNER_BONUS),
        }
    }
}

impl Evaluator {
    /// Composite evaluator with the standard table and every feature enabled.
    pub fn strategic() -> Self {
        Evaluator::Composite {
            weights: WeightTable::default(),
            features: Features::all(),
        }
    }

    /// Score `board` from `side`'s point of view.
    pub fn score(&self, board: &Board, side: Side) -> i32 {
        match self {
            Evaluator::Material { corner_bonus } => material(board, side, *corner_bonus),
            Evaluator::Positional { weights } => positional(board, side, weights),
            Evaluator::Composite { weights, features } => {
                positional(board, side, weights) + feature_terms(board, side, features)
            }
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Evaluator::Material { .. } => "material",
            Evaluator::Positional { .. } => "positional",
            Evaluator::Composite { .. } => "composite",
        }
    }
}

/// +1 for `side`, -1 for the opponent, 0 for empty.
#[inline]
fn sign_of(board: &Board, pos: Pos, side: Side) -> i32 {
    match board.get(pos) {
        Some(s) if s == side => 1,
        Some(_) => -1,
        None => 0,
    }
}

fn material(board: &Board, side: Side, corner_bonus: Option<i32>) -> i32 {
    let mut score = board.disc_diff(side);
    if let Some(bonus) = corner_bonus {
        score += board
            .corners()
            .iter()
            .map(|&p| sign_of(board, p, side) * bonus)
            .sum::<i32>();
    }
    score
}

fn positional(board: &Board, side: Side, weights: &WeightTable) -> i32 {
    let dot = |w: &WeightTable| -> i32 {
        board
            .positions()
            .map(|p| sign_of(board, p, side) * w.weight(p))
            .sum()
    };
    if weights.fits(board) {
        dot(weights)
    } else {
        dot(&WeightTable::standard(board.size()))
    }
}

fn feature_terms(board: &Board, side: Side, features: &Features) -> i32 {
    let mut score = 0;
    let opp = side.opponent();

    if let Some(bonus) = features.stable_bonus {
        score += bonus * (count_stable(board, side) as i32 - count_stable(board, opp) as i32);
    }

    if let Some(bonus) = features.parity_bonus {
        if board.empty_count() <= PARITY_THRESHOLD {
            score += bonus * board.disc_diff(side).signum();
        }
    }

    if let Some(penalty) = features.x_square_penalty {
        score -= board
            .x_squares()
            .iter()
            .map(|&p| sign_of(board, p, side) * penalty)
            .sum::<i32>();
    }

    if let Some(penalty) = features.corner_trap_penalty {
        score -= board
            .corner_trap_zone()
            .iter()
            .map(|&p| sign_of(board, p, side) * penalty)
            .sum::<i32>();
    }

    score
}

/// A stone is stable when every ray from it to the edge, in all eight
/// directions, contains only stones of its own colour.
pub fn is_stable(board: &Board, pos: Pos) -> bool {
    let Some(owner) = board.get(pos) else {
        return false;
    };
    DIRECTIONS.iter().all(|&dir| {
        let mut cur = board.step(pos, dir);
        while let Some(p) = cur {
            if board.get(p) != Some(owner) {
                return false;
            }
            cur = board.step(p, dir);
        }
        true
    })
}

/// Number of stable stones belonging to `side`.
pub fn count_stable(board: &Board, side: Side) -> usize {
    board
        .cells()
        .filter(|&(p, c)| c == Some(side) && is_stable(board, p))
        .count()
}
