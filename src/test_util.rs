// Test utilities shared by unit tests and integration tests.

use crate::color::Color;
use crate::coord::Coord;
use crate::grid::Grid;


// Panics on out-of-range values, which is what a test wants.
pub fn coord(row: u8, col: u8) -> Coord { Coord::from_zero_based(row, col) }

pub fn parse_grid(black: &[(u8, u8)], white: &[(u8, u8)]) -> Grid {
    let mut grid = Grid::new();
    for &(row, col) in black {
        grid[coord(row, col)] = Some(Color::Black);
    }
    for &(row, col) in white {
        grid[coord(row, col)] = Some(Color::White);
    }
    grid
}
