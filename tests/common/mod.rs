// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use gomoku_online::color::Color;
use gomoku_online::coord::BOARD_SIZE;
use gomoku_online::event::GomokuServerEvent;
use gomoku_online::grid::{Cell, Grid};
use gomoku_online::participant::{Participant, Role};
use rand::SeedableRng;


// Random tests verify properties that should always hold, but let's fix the seed to avoid
// sporadic failures.
#[allow(dead_code)]
pub fn deterministic_rng() -> rand::rngs::StdRng { rand::rngs::StdRng::seed_from_u64(0) }

// What a client would display, reconstructed purely from server events.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClientView {
    pub grid: Vec<Vec<Cell>>,
    pub turn: Option<Color>,
    pub role: Option<Role>,
    pub participants: Vec<Participant>,
    pub winner: Option<Color>,
}

impl ClientView {
    pub fn new() -> Self {
        ClientView {
            grid: Grid::new().to_rows(),
            turn: None,
            role: None,
            participants: vec![],
            winner: None,
        }
    }

    pub fn apply(&mut self, event: &GomokuServerEvent) {
        use GomokuServerEvent::*;
        match event {
            InitialBoardState { grid } => {
                assert_eq!(grid.len(), BOARD_SIZE as usize);
                self.grid = grid.clone();
            }
            RoleAssignment { role } => self.role = Some(*role),
            RosterUpdate { participants } => self.participants = participants.clone(),
            TurnUpdate { color } => self.turn = Some(*color),
            CellUpdate { row, col, color } => {
                self.grid[*row as usize][*col as usize] = Some(*color);
            }
            BoardCleared => {
                self.grid = Grid::new().to_rows();
                self.winner = None;
            }
            GameOutcome { winner } => self.winner = Some(*winner),
            Pong => {}
        }
    }

    #[allow(dead_code)]
    pub fn players(&self) -> Vec<(String, Color)> {
        self.participants
            .iter()
            .filter_map(|p| p.role.color().map(|color| (p.name.clone(), color)))
            .collect()
    }
}
