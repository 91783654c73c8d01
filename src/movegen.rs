//! Legal move generation and move application.
//!
//! A move places a stone on an empty cell and flips every contiguous run of
//! opponent stones that is bracketed by another stone of the mover in one of
//! the eight directions. A cell with nothing to flip is not a legal move.

use std::fmt;

use crate::board::{Board, Pos, Side};
use crate::constants::DIRECTIONS;

/// A legal move: the target cell and the opponent stones it flips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub pos: Pos,
    pub flips: Vec<Pos>,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (flips {})", self.pos, self.flips.len())
    }
}

/// Collect the stones `side` would flip by playing at `pos`.
///
/// Returns an empty list when `pos` is occupied or brackets nothing.
pub fn flips_at(board: &Board, pos: Pos, side: Side) -> Vec<Pos> {
    let mut flips = Vec::new();
    if board.get(pos).is_some() {
        return flips;
    }
    let opp = side.opponent();
    for dir in DIRECTIONS {
        let run_start = flips.len();
        let mut cur = board.step(pos, dir);
        while let Some(p) = cur {
            if board.get(p) != Some(opp) {
                break;
            }
            flips.push(p);
            cur = board.step(p, dir);
        }
        let anchored = matches!(cur, Some(p) if board.get(p) == Some(side));
        if !anchored {
            flips.truncate(run_start);
        }
    }
    flips
}

/// Whether `side` brackets at least one stone by playing at `pos`.
fn brackets_any(board: &Board, pos: Pos, side: Side) -> bool {
    let opp = side.opponent();
    DIRECTIONS.iter().any(|&dir| {
        let mut cur = board.step(pos, dir);
        let mut run = 0;
        while let Some(p) = cur {
            match board.get(p) {
                Some(s) if s == opp => run += 1,
                Some(_) => return run > 0,
                None => return false,
            }
            cur = board.step(p, dir);
        }
        false
    })
}

/// Enumerate all legal moves for `side` in row-major order.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .positions()
        .filter_map(|pos| {
            let flips = flips_at(board, pos, side);
            (!flips.is_empty()).then_some(Move { pos, flips })
        })
        .collect()
}

/// Whether `side` has any legal move. Stops at the first one found.
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    board
        .positions()
        .any(|pos| board.get(pos).is_none() && brackets_any(board, pos, side))
}

impl Board {
    /// Place the move's stone and flip its captures in place.
    pub fn apply(&mut self, mv: &Move, side: Side) {
        self.set(mv.pos, Some(side));
        for &p in &mv.flips {
            self.set(p, Some(side));
        }
    }

    /// A copy of this board with the move applied.
    pub fn after(&self, mv: &Move, side: Side) -> Board {
        let mut next = self.clone();
        next.apply(mv, side);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_moves_black() {
        let board = Board::opening(8);
        let moves = legal_moves(&board, Side::Black);
        let targets: Vec<String> = moves.iter().map(|m| m.pos.to_string()).collect();
        assert_eq!(targets, vec!["d3", "c4", "f5", "e6"]);
        assert!(moves.iter().all(|m| m.flips.len() == 1));
    }

    #[test]
    fn test_flips_union_across_directions() {
        let board: Board = "
            X . . . .
            O . . . .
            . O O X .
            . . . . .
            . . . . .
        "
        .parse()
        .unwrap();
        // Playing (2,0) flips upward (1,0) and rightward (2,1),(2,2).
        let mut flips = flips_at(&board, Pos::new(2, 0), Side::Black);
        flips.sort();
        assert_eq!(flips, vec![Pos::new(1, 0), Pos::new(2, 1), Pos::new(2, 2)]);
    }

    #[test]
    fn test_unanchored_run_flips_nothing() {
        let board: Board = "
            . O O .
            . . . .
            . . . .
            . . . .
        "
        .parse()
        .unwrap();
        assert!(flips_at(&board, Pos::new(0, 0), Side::Black).is_empty());
        assert!(!has_legal_move(&board, Side::Black));
    }

    #[test]
    fn test_occupied_cell_is_not_a_move() {
        let board = Board::opening(8);
        assert!(flips_at(&board, Pos::new(3, 3), Side::Black).is_empty());
    }

    #[test]
    fn test_has_legal_move_agrees_with_generator() {
        let mut board = Board::opening(8);
        let mut side = Side::Black;
        for _ in 0..20 {
            let moves = legal_moves(&board, side);
            assert_eq!(has_legal_move(&board, side), !moves.is_empty());
            if let Some(mv) = moves.last() {
                board.apply(mv, side);
            }
            side = side.opponent();
        }
    }

    #[test]
    fn test_after_does_not_touch_original() {
        let board = Board::opening(8);
        let mv = legal_moves(&board, Side::Black).remove(0);
        let next = board.after(&mv, Side::Black);
        assert_eq!(board, Board::opening(8));
        assert_eq!(next.get(mv.pos), Some(Side::Black));
        for p in &mv.flips {
            assert_eq!(next.get(*p), Some(Side::Black));
        }
        assert_eq!(next.count(Side::Black), 4);
    }
}
