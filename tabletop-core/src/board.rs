//! Checkers board geometry with (row, col) coordinates

use serde::{Deserialize, Serialize};

/// Board size (rows and columns)
pub const BOARD_SIZE: i8 = 8;

/// A board square, serialized as `[row, col]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i8; 2]", into = "[i8; 2]")]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Dark squares are the only playable ones
    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Square reached by moving (dr, dc)
    pub fn offset(&self, dr: i8, dc: i8) -> Square {
        Square::new(self.row + dr, self.col + dc)
    }

    /// Number of diagonal steps to `other`, or None if not on a shared diagonal
    pub fn diagonal_distance(&self, other: Square) -> Option<i8> {
        let dr = (other.row - self.row).abs();
        let dc = (other.col - self.col).abs();
        (dr == dc && dr > 0).then_some(dr)
    }

    /// Square halfway between two squares two diagonal steps apart
    pub fn midpoint(&self, other: Square) -> Option<Square> {
        match self.diagonal_distance(other) {
            Some(2) => Some(Square::new(
                (self.row + other.row) / 2,
                (self.col + other.col) / 2,
            )),
            _ => None,
        }
    }

    /// Iterate over every square of the board, row by row
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }
}

impl From<[i8; 2]> for Square {
    fn from([row, col]: [i8; 2]) -> Self {
        Square::new(row, col)
    }
}

impl From<Square> for [i8; 2] {
    fn from(square: Square) -> Self {
        [square.row, square.col]
    }
}

/// Diagonal direction vectors (dr, dc)
/// Index: 0=up-left, 1=up-right, 2=down-left, 3=down-right
pub const DIAGONALS: [(i8, i8); 4] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
