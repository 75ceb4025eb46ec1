use serde::{Deserialize, Serialize};

use crate::color::Color;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Role {
    // Sees everything, cannot touch the board. Waits in line for a free player slot.
    Viewer,
    Player(Color),
}

impl Role {
    pub fn is_player(self) -> bool { matches!(self, Role::Player(_)) }
    pub fn color(self) -> Option<Color> {
        match self {
            Role::Viewer => None,
            Role::Player(color) => Some(color),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: Role,
}
