use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::color::Color;
use crate::coord::Coord;
use crate::grid::Grid;


pub const WIN_LENGTH: usize = 5;

// Line orientations in the order they are checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
    DiagonalDownRight,
    DiagonalDownLeft,
}

impl Orientation {
    // (row, col) step. The opposite direction is the negation.
    pub fn step(self) -> (i8, i8) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::DiagonalDownRight => (1, 1),
            Orientation::DiagonalDownLeft => (1, -1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Victory(Color),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveError {
    WrongTurnOrder,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    // The game goes on; contains the color to move next.
    NextTurn(Color),
    // The stone completed a line. Turn is not passed.
    Victory { winner: Color, orientation: Orientation },
}

// Number of contiguous `color` stones starting next to `from` and going in `dir`. Does not
// include `from` itself.
fn count_ray(grid: &Grid, from: Coord, dir: (i8, i8), color: Color) -> usize {
    let mut count = 0;
    let mut pos = from;
    while let Some(next) = pos.step(dir) {
        if grid[next] != Some(color) {
            break;
        }
        count += 1;
        pos = next;
    }
    count
}

// Length of the `color` line through `pos` along `orientation`, counting `pos` itself regardless
// of what it holds.
pub fn line_length(grid: &Grid, pos: Coord, orientation: Orientation, color: Color) -> usize {
    let (d_row, d_col) = orientation.step();
    1 + count_ray(grid, pos, (d_row, d_col), color) + count_ray(grid, pos, (-d_row, -d_col), color)
}

// Returns the first orientation (in `Orientation` order) in which a stone of `color` at `pos`
// is part of a line of at least `WIN_LENGTH`. Overlines count.
pub fn find_winning_line(grid: &Grid, pos: Coord, color: Color) -> Option<Orientation> {
    Orientation::iter().find(|&orientation| line_length(grid, pos, orientation, color) >= WIN_LENGTH)
}

pub fn is_win(grid: &Grid, pos: Coord, color: Color) -> bool {
    find_winning_line(grid, pos, color).is_some()
}


#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    active_color: Color,
    status: GameStatus,
}

impl Board {
    pub fn new() -> Self {
        Board {
            grid: Grid::new(),
            active_color: Color::FIRST_TO_MOVE,
            status: GameStatus::Active,
        }
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn active_color(&self) -> Color { self.active_color }
    pub fn status(&self) -> GameStatus { self.status }

    pub fn reset(&mut self) { *self = Board::new(); }

    // Overwrites the turn cursor without any validation. Does not affect game status.
    pub fn set_active_color(&mut self, color: Color) { self.active_color = color; }

    // Places a stone. An occupied cell is overwritten: stones are never removed, but the owner
    // of an intersection may change.
    pub fn try_place(&mut self, color: Color, pos: Coord) -> Result<MoveOutcome, MoveError> {
        if self.status != GameStatus::Active {
            return Err(MoveError::GameOver);
        }
        if color != self.active_color {
            return Err(MoveError::WrongTurnOrder);
        }
        self.grid[pos] = Some(color);
        if let Some(orientation) = find_winning_line(&self.grid, pos, color) {
            self.status = GameStatus::Victory(color);
            Ok(MoveOutcome::Victory { winner: color, orientation })
        } else {
            self.active_color = color.opponent();
            Ok(MoveOutcome::NextTurn(self.active_color))
        }
    }
}
