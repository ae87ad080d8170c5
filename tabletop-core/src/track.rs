//! Ludo track geometry: shared circular path plus per-color home columns

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cells on the shared circular track
pub const TRACK_LENGTH: u8 = 52;

/// Track cells on which pieces cannot be captured
pub const SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Last distance spent on the shared track before turning into the home column
pub const HOME_ENTRY_DISTANCE: u8 = 50;

/// Distance at which a piece is finished (home column cell 5)
pub const FINISH_DISTANCE: u8 = 56;

/// Occupiable home column cells before the finish
pub const HOME_CELLS: u8 = FINISH_DISTANCE - HOME_ENTRY_DISTANCE - 1;

/// Player color, also the seat order of a Ludo table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LudoColor {
    Red,
    Blue,
    Yellow,
    Green,
}

impl LudoColor {
    /// Colors in assignment order
    pub const ALL: [LudoColor; 4] = [
        LudoColor::Red,
        LudoColor::Blue,
        LudoColor::Yellow,
        LudoColor::Green,
    ];

    /// Track cell where this color's pieces enter play
    pub fn start_cell(self) -> u8 {
        match self {
            LudoColor::Red => 0,
            LudoColor::Blue => 13,
            LudoColor::Yellow => 26,
            LudoColor::Green => 39,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LudoColor::Red => "red",
            LudoColor::Blue => "blue",
            LudoColor::Yellow => "yellow",
            LudoColor::Green => "green",
        }
    }
}

impl fmt::Display for LudoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a Ludo piece is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    /// Waiting in the color's base
    Base,
    /// On the shared track (0..52)
    Track(u8),
    /// In the color's private home column (0..5)
    Home(u8),
    /// Reached the center
    Finished,
}

impl Position {
    /// Position of a piece of `color` that has travelled `distance` cells from its start
    ///
    /// Returns None past the finish.
    pub fn from_distance(color: LudoColor, distance: u8) -> Option<Position> {
        match distance {
            d if d <= HOME_ENTRY_DISTANCE => {
                Some(Position::Track((color.start_cell() + d) % TRACK_LENGTH))
            }
            d if d < FINISH_DISTANCE => Some(Position::Home(d - HOME_ENTRY_DISTANCE - 1)),
            FINISH_DISTANCE => Some(Position::Finished),
            _ => None,
        }
    }

    /// Track cell, if the piece is on the shared track
    pub fn track_cell(&self) -> Option<u8> {
        match *self {
            Position::Track(cell) => Some(cell),
            _ => None,
        }
    }
}

/// Check whether a track cell protects its occupants
pub fn is_safe(cell: u8) -> bool {
    SAFE_CELLS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_cells_are_safe() {
        for color in LudoColor::ALL {
            assert!(is_safe(color.start_cell()));
        }
    }

    #[test]
    fn test_distance_mapping_wraps_track() {
        assert_eq!(Position::from_distance(LudoColor::Red, 0), Some(Position::Track(0)));
        assert_eq!(Position::from_distance(LudoColor::Green, 12), Some(Position::Track(51)));
        assert_eq!(Position::from_distance(LudoColor::Green, 13), Some(Position::Track(0)));
        assert_eq!(Position::from_distance(LudoColor::Blue, 50), Some(Position::Track(11)));
    }

    #[test]
    fn test_distance_mapping_home_column() {
        assert_eq!(Position::from_distance(LudoColor::Red, 51), Some(Position::Home(0)));
        assert_eq!(Position::from_distance(LudoColor::Red, 55), Some(Position::Home(4)));
        assert_eq!(Position::from_distance(LudoColor::Red, 56), Some(Position::Finished));
        assert_eq!(Position::from_distance(LudoColor::Red, 57), None);
        assert_eq!(HOME_CELLS, 5);
    }

    #[test]
    fn test_position_wire_format() {
        assert_eq!(serde_json::to_string(&Position::Base).unwrap(), "\"base\"");
        assert_eq!(serde_json::to_string(&Position::Track(8)).unwrap(), "{\"track\":8}");
        assert_eq!(serde_json::to_string(&Position::Home(2)).unwrap(), "{\"home\":2}");
    }
}
