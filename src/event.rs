use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::grid::Cell;
use crate::participant::{Participant, Role};


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GomokuServerEvent {
    // Full board. Sent to a connection when it connects and again when it joins.
    InitialBoardState {
        grid: Vec<Vec<Cell>>,
    },
    // Sent to a single connection: on join, when recolored, or when promoted from viewer.
    RoleAssignment {
        role: Role,
    },
    // Everybody who has joined, in join order.
    RosterUpdate {
        participants: Vec<Participant>,
    },
    TurnUpdate {
        color: Color,
    },
    CellUpdate {
        row: u8,
        col: u8,
        color: Color,
    },
    BoardCleared,
    GameOutcome {
        winner: Color,
    },
    Pong,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GomokuClientEvent {
    Join {
        player_name: String,
    },
    // Coordinates are validated by the server; anything outside of the board is ignored.
    MakeMove {
        row: i64,
        col: i64,
    },
    ClearBoard,
    // Overrides the turn cursor. Kept for compatibility with clients that flip the turn
    // themselves; can be disabled in server options.
    SetTurn {
        color: Color,
    },
    Ping,
}
