use std::fmt;

use itertools::Itertools;
use static_assertions::const_assert;


pub const BOARD_SIZE: u8 = 15;

const_assert!(BOARD_SIZE as usize <= i8::MAX as usize);


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoordError {
    RowOutOfBounds(i64),
    ColOutOfBounds(i64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::RowOutOfBounds(row) => {
                write!(f, "row {row} is outside of [0, {BOARD_SIZE})")
            }
            CoordError::ColOutOfBounds(col) => {
                write!(f, "column {col} is outside of [0, {BOARD_SIZE})")
            }
        }
    }
}

impl std::error::Error for CoordError {}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < BOARD_SIZE);
        Self { idx }
    }
    pub fn try_from_zero_based(idx: i64) -> Result<Self, CoordError> {
        u8::try_from(idx)
            .ok()
            .filter(|&idx| idx < BOARD_SIZE)
            .map(|idx| Self { idx })
            .ok_or(CoordError::RowOutOfBounds(idx))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..BOARD_SIZE).map(Self::from_zero_based)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < BOARD_SIZE);
        Self { idx }
    }
    pub fn try_from_zero_based(idx: i64) -> Result<Self, CoordError> {
        u8::try_from(idx)
            .ok()
            .filter(|&idx| idx < BOARD_SIZE)
            .map(|idx| Self { idx })
            .ok_or(CoordError::ColOutOfBounds(idx))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..BOARD_SIZE).map(Self::from_zero_based)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    // Panics if out of bounds. Meant for constants and tests; use `try_from_zero_based` for
    // anything coming over the network.
    pub const fn from_zero_based(row: u8, col: u8) -> Self {
        Self::new(Row::from_zero_based(row), Col::from_zero_based(col))
    }

    pub fn try_from_zero_based(row: i64, col: i64) -> Result<Self, CoordError> {
        Ok(Self::new(Row::try_from_zero_based(row)?, Col::try_from_zero_based(col)?))
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }

    // Returns `None` when the step leaves the board.
    pub fn step(self, (d_row, d_col): (i8, i8)) -> Option<Coord> {
        let row = self.row.to_zero_based() as i64 + d_row as i64;
        let col = self.col.to_zero_based() as i64 + d_col as i64;
        Coord::try_from_zero_based(row, col).ok()
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.row.to_zero_based(), self.col.to_zero_based())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bounds() {
        assert!(Coord::try_from_zero_based(0, 0).is_ok());
        assert!(Coord::try_from_zero_based(14, 14).is_ok());
        assert_eq!(Coord::try_from_zero_based(15, 0), Err(CoordError::RowOutOfBounds(15)));
        assert_eq!(Coord::try_from_zero_based(0, -1), Err(CoordError::ColOutOfBounds(-1)));
        assert_eq!(
            Coord::try_from_zero_based(i64::MAX, 3),
            Err(CoordError::RowOutOfBounds(i64::MAX))
        );
    }

    #[test]
    fn step_stops_at_edges() {
        let corner = Coord::from_zero_based(0, 14);
        assert_eq!(corner.step((1, -1)), Some(Coord::from_zero_based(1, 13)));
        assert_eq!(corner.step((-1, 0)), None);
        assert_eq!(corner.step((0, 1)), None);
    }

    #[test]
    fn all_coords() {
        assert_eq!(Coord::all().count(), BOARD_SIZE as usize * BOARD_SIZE as usize);
    }
}
