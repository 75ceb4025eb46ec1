use std::{fmt, ops};

use itertools::Itertools;
use ndarray::{Array, Array2};

use crate::color::Color;
use crate::coord::{BOARD_SIZE, Coord};


// Cell contents. `None` is an empty intersection.
pub type Cell = Option<Color>;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    data: Array2<Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((BOARD_SIZE as usize, BOARD_SIZE as usize), None),
        }
    }

    pub fn is_empty(&self) -> bool { self.data.iter().all(|cell| cell.is_none()) }
    pub fn num_stones(&self) -> usize { self.data.iter().filter(|cell| cell.is_some()).count() }

    // Row-major snapshot, the shape used on the wire.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Cell;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        &mut self.data[coord_to_index(pos)]
    }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [pos.row.to_zero_based() as usize, pos.col.to_zero_based() as usize]
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self.data.rows().into_iter().map(|row| {
            row.iter()
                .map(|cell| match cell {
                    None => '.',
                    Some(Color::Black) => 'x',
                    Some(Color::White) => 'o',
                })
                .collect::<String>()
        });
        write!(f, "Grid [{}]", rows.format(", "))
    }
}
