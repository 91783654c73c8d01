//! Game session: the authoritative board plus the side to move.
//!
//! The session applies moves chosen by a player or the engine and advances
//! the turn, handling forced passes and detecting the end of the game. Search
//! code never sees a `Game`; it receives copies of the board.

use std::fmt;

use thiserror::Error;

use crate::board::{Board, Pos, Side};
use crate::constants::SIZE;
use crate::movegen::{Move, flips_at, has_legal_move, legal_moves};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move at {0}")]
    IllegalMove(Pos),
    #[error("cannot pass while a legal move exists")]
    PassWithMoves,
    #[error("the game is over")]
    GameOver,
}

/// Final result by strict stone majority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(side) => write!(f, "{side} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// What happened to the turn after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The opponent moves next.
    Next(Side),
    /// `passed` had no legal move; `to_move` moves again.
    Pass { passed: Side, to_move: Side },
    /// Neither side can move.
    Over(Outcome),
}

/// Outcome of a board on stone count alone.
pub fn outcome(board: &Board) -> Outcome {
    match board.disc_diff(Side::Black) {
        d if d > 0 => Outcome::Winner(Side::Black),
        d if d < 0 => Outcome::Winner(Side::White),
        _ => Outcome::Draw,
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Side,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(SIZE)
    }
}

impl Game {
    /// Standard opening position, Black to move. Panics outside the sizes
    /// [`Board::new`] accepts.
    pub fn new(size: usize) -> Self {
        Self {
            board: Board::opening(size),
            to_move: Side::Black,
        }
    }

    /// Resume from an arbitrary position.
    pub fn from_board(board: Board, to_move: Side) -> Self {
        Self { board, to_move }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board, self.to_move)
    }

    pub fn is_over(&self) -> bool {
        !has_legal_move(&self.board, Side::Black) && !has_legal_move(&self.board, Side::White)
    }

    /// The result, once neither side can move.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_over().then(|| outcome(&self.board))
    }

    /// (black, white) stone counts.
    pub fn counts(&self) -> (usize, usize) {
        (self.board.count(Side::Black), self.board.count(Side::White))
    }

    /// Play at `pos` for the side to move. Flips are recomputed from the
    /// current board, so the caller only needs the coordinate.
    pub fn play_at(&mut self, pos: Pos) -> Result<Turn, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if pos.row >= self.board.size() || pos.col >= self.board.size() {
            return Err(GameError::IllegalMove(pos));
        }
        let flips = flips_at(&self.board, pos, self.to_move);
        if flips.is_empty() {
            return Err(GameError::IllegalMove(pos));
        }
        self.board.apply(&Move { pos, flips }, self.to_move);
        Ok(self.advance())
    }

    /// Play a move produced by the move generator or an engine.
    pub fn play(&mut self, mv: &Move) -> Result<Turn, GameError> {
        self.play_at(mv.pos)
    }

    /// Pass explicitly. Only allowed when the side to move is stuck.
    pub fn pass(&mut self) -> Result<Turn, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if has_legal_move(&self.board, self.to_move) {
            return Err(GameError::PassWithMoves);
        }
        let passed = self.to_move;
        self.to_move = passed.opponent();
        Ok(Turn::Pass {
            passed,
            to_move: self.to_move,
        })
    }

    fn advance(&mut self) -> Turn {
        let next = self.to_move.opponent();
        if has_legal_move(&self.board, next) {
            self.to_move = next;
            Turn::Next(next)
        } else if has_legal_move(&self.board, self.to_move) {
            log::debug!("{next} has no legal move and passes");
            Turn::Pass {
                passed: next,
                to_move: self.to_move,
            }
        } else {
            self.to_move = next;
            Turn::Over(outcome(&self.board))
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (black, white) = self.counts();
        write!(f, "{}", self.board)?;
        write!(f, "X: {black}  O: {white}  ")?;
        match self.outcome() {
            Some(result) => writeln!(f, "game over, {result}"),
            None => writeln!(f, "{} to move", self.to_move),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Game::default();
        assert_eq!(game.to_move(), Side::Black);
        assert_eq!(game.counts(), (2, 2));
        assert_eq!(game.legal_moves().len(), 4);
        assert!(!game.is_over());
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_play_advances_turn() {
        let mut game = Game::default();
        let turn = game.play_at("d3".parse().unwrap()).unwrap();
        assert_eq!(turn, Turn::Next(Side::White));
        assert_eq!(game.counts(), (4, 1));
    }

    #[test]
    fn test_illegal_moves_rejected() {
        let mut game = Game::default();
        assert_eq!(
            game.play_at(Pos::new(0, 0)),
            Err(GameError::IllegalMove(Pos::new(0, 0)))
        );
        assert_eq!(
            game.play_at(Pos::new(3, 3)),
            Err(GameError::IllegalMove(Pos::new(3, 3)))
        );
        assert_eq!(
            game.play_at(Pos::new(9, 9)),
            Err(GameError::IllegalMove(Pos::new(9, 9)))
        );
        assert_eq!(game.pass(), Err(GameError::PassWithMoves));
    }

    #[test]
    fn test_forced_pass_returns_turn() {
        // After Black takes (0,3), White has no move but Black still does.
        let board: Board = "
            X X X .
            X X X O
            . O X X
            X X X X
        "
        .parse()
        .unwrap();
        let mut game = Game::from_board(board, Side::Black);
        let turn = game.play_at(Pos::new(0, 3)).unwrap();
        assert_eq!(
            turn,
            Turn::Pass {
                passed: Side::White,
                to_move: Side::Black
            }
        );
        assert_eq!(game.to_move(), Side::Black);
    }

    #[test]
    fn test_game_over_by_majority() {
        let board: Board = "
            X X X X
            X X X X
            X X X X
            O O O .
        "
        .parse()
        .unwrap();
        let game = Game::from_board(board, Side::White);
        assert!(game.is_over());
        assert_eq!(game.outcome(), Some(Outcome::Winner(Side::Black)));

        let draw: Board = "
            X X X X
            X X X X
            O O O O
            O O O O
        "
        .parse()
        .unwrap();
        assert_eq!(outcome(&draw), Outcome::Draw);
        assert_eq!(
            outcome(&"OOOOOOOOOOOXXXXX".parse().unwrap()),
            Outcome::Winner(Side::White)
        );
    }

    #[test]
    fn test_pass_when_stuck() {
        let board: Board = "
            X X X X
            X X X X
            . O X X
            X X X X
        "
        .parse()
        .unwrap();
        let mut game = Game::from_board(board, Side::White);
        assert!(game.legal_moves().is_empty());
        let turn = game.pass().unwrap();
        assert_eq!(
            turn,
            Turn::Pass {
                passed: Side::White,
                to_move: Side::Black
            }
        );
    }
}
