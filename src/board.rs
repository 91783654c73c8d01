//! Grid representation: sides, coordinates, and the board itself.
//!
//! The board is a flat `Vec` of cells in row-major order. It is size-parametric;
//! the standard game uses [`crate::constants::SIZE`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{MAX_SIZE, MIN_SIZE};

/// One of the two players. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Character used for this side in the textual board format.
    pub fn symbol(self) -> char {
        match self {
            Side::Black => 'X',
            Side::White => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

impl FromStr for Side {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" | "x" => Ok(Side::Black),
            "white" | "w" | "o" => Ok(Side::White),
            _ => Err(BoardError::UnknownSide(s.to_string())),
        }
    }
}

/// A cell is either empty or holds a stone of one side.
pub type Cell = Option<Side>;

/// A coordinate on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Formats as column letter plus 1-based row, e.g. `d3`.
impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col), self.row + 1)
    }
}

impl FromStr for Pos {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let mut chars = s.chars();
        let col = match chars.next() {
            Some(c @ 'a'..='z') => c as usize - 'a' as usize,
            _ => return Err(BoardError::BadCoord(s.clone())),
        };
        let row: usize = chars
            .as_str()
            .parse()
            .map_err(|_| BoardError::BadCoord(s.clone()))?;
        if row == 0 {
            return Err(BoardError::BadCoord(s));
        }
        Ok(Pos::new(row - 1, col))
    }
}

/// Column letter, or `?` past the last labelled column.
fn column_label(col: usize) -> char {
    u8::try_from(col)
        .ok()
        .filter(|&c| (c as usize) < MAX_SIZE)
        .map_or('?', |c| (b'a' + c) as char)
}

/// Errors produced when parsing boards, sides, or coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board text has {0} cells, which is not a square of at least 2x2")]
    NotSquare(usize),
    #[error("board size {0} is larger than {MAX_SIZE}x{MAX_SIZE}")]
    TooLarge(usize),
    #[error("unexpected character {0:?} in board text")]
    BadChar(char),
    #[error("unknown side {0:?}")]
    UnknownSide(String),
    #[error("invalid coordinate {0:?}")]
    BadCoord(String),
}

/// Compact, collision-free encoding of the board contents.
///
/// Two bitmaps (black, then white) packed into 64-bit words.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardKey(Box<[u64]>);

/// A square grid of cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    ///
    /// Panics unless `MIN_SIZE <= size <= MAX_SIZE`. Text boards are checked
    /// by [`FromStr`] instead.
    pub fn new(size: usize) -> Self {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "board size {size} outside {MIN_SIZE}..={MAX_SIZE}"
        );
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Create a board with the standard opening: the centre 2x2 filled with
    /// two stones per side on the diagonals. Same size limits as
    /// [`Board::new`].
    pub fn opening(size: usize) -> Self {
        let mut board = Self::new(size);
        let lo = size / 2 - 1;
        let hi = size / 2;
        board.set(Pos::new(lo, lo), Some(Side::White));
        board.set(Pos::new(hi, hi), Some(Side::White));
        board.set(Pos::new(lo, hi), Some(Side::Black));
        board.set(Pos::new(hi, lo), Some(Side::Black));
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn idx(&self, pos: Pos) -> usize {
        pos.row * self.size + pos.col
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.idx(pos)]
    }

    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let i = self.idx(pos);
        self.cells[i] = cell;
    }

    /// Step from `pos` by `(dr, dc)`, returning `None` off the board.
    #[inline]
    pub fn step(&self, pos: Pos, (dr, dc): (isize, isize)) -> Option<Pos> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        (row < self.size && col < self.size).then_some(Pos::new(row, col))
    }

    /// All coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let size = self.size;
        (0..size * size).map(move |i| Pos::new(i / size, i % size))
    }

    /// Iterate over `(pos, cell)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.positions().map(|p| (p, self.get(p)))
    }

    /// Number of stones of the given side.
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|&&c| c == Some(side)).count()
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Own stones minus opponent stones.
    pub fn disc_diff(&self, side: Side) -> i32 {
        self.count(side) as i32 - self.count(side.opponent()) as i32
    }

    /// The four corner coordinates.
    pub fn corners(&self) -> [Pos; 4] {
        let m = self.size - 1;
        [Pos::new(0, 0), Pos::new(0, m), Pos::new(m, 0), Pos::new(m, m)]
    }

    /// The cells diagonally adjacent to each corner.
    pub fn x_squares(&self) -> [Pos; 4] {
        let m = self.size - 1;
        [
            Pos::new(1, 1),
            Pos::new(1, m - 1),
            Pos::new(m - 1, 1),
            Pos::new(m - 1, m - 1),
        ]
    }

    /// The three cells touching each corner (both orthogonal neighbours and
    /// the X-square), twelve in total.
    pub fn corner_trap_zone(&self) -> [Pos; 12] {
        let m = self.size - 1;
        [
            Pos::new(0, 1),
            Pos::new(1, 0),
            Pos::new(1, 1),
            Pos::new(0, m - 1),
            Pos::new(1, m),
            Pos::new(1, m - 1),
            Pos::new(m, 1),
            Pos::new(m - 1, 0),
            Pos::new(m - 1, 1),
            Pos::new(m, m - 1),
            Pos::new(m - 1, m),
            Pos::new(m - 1, m - 1),
        ]
    }

    /// Packed key for the transposition cache.
    pub fn key(&self) -> BoardKey {
        let n = self.cells.len();
        let words = n.div_ceil(64);
        let mut packed = vec![0u64; words * 2];
        for (i, cell) in self.cells.iter().enumerate() {
            let bit = 1u64 << (i % 64);
            match cell {
                Some(Side::Black) => packed[i / 64] |= bit,
                Some(Side::White) => packed[words + i / 64] |= bit,
                None => {}
            }
        }
        BoardKey(packed.into_boxed_slice())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::opening(crate::constants::SIZE)
    }
}

/// Parses rows of `.`, `X`/`B` (black) and `O`/`W` (white). Whitespace is
/// ignored, so a board may be written on one line or one row per line.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            cells.push(match ch {
                '.' | '-' => None,
                'X' | 'x' | 'B' | 'b' => Some(Side::Black),
                'O' | 'o' | 'W' | 'w' => Some(Side::White),
                other => return Err(BoardError::BadChar(other)),
            });
        }
        let size = cells.len().isqrt();
        if size < MIN_SIZE || size * size != cells.len() {
            return Err(BoardError::NotSquare(cells.len()));
        }
        if size > MAX_SIZE {
            return Err(BoardError::TooLarge(size));
        }
        Ok(Board { size, cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..self.size {
            write!(f, " {}", column_label(col))?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{:>2}", row + 1)?;
            for col in 0..self.size {
                let ch = match self.get(Pos::new(row, col)) {
                    Some(side) => side.symbol(),
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
