// Who is connected under which role. Knows nothing about the board or the network; reports what
// changed so that the caller can notify the affected connections.

use std::collections::VecDeque;

use enum_map::{EnumMap, enum_map};
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::color::Color;
use crate::participant::{Participant, Role};
use crate::server::ClientId;
use crate::{ensure_invariant, internal_error_message};


pub const TOTAL_PLAYERS: usize = 2;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinOutcome {
    pub role: Role,
    // An existing player that had to change color to make room for the newcomer.
    pub recolored: Option<(ClientId, Color)>,
    // Both player slots became occupied: a fresh match begins.
    pub match_started: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LeaveOutcome {
    pub participant: Participant,
    // The remaining player, moved to Black.
    pub recolored: Option<(ClientId, Color)>,
    // The viewer that took over the vacated slot.
    pub promoted: Option<(ClientId, Color)>,
}

#[derive(Clone, Debug)]
pub struct Roster {
    // Join order. This is also the order in which participants are shown to clients.
    entries: Vec<(ClientId, Participant)>,
    players: EnumMap<Color, Option<ClientId>>,
    // Viewers waiting for a player slot, longest waiting first.
    viewer_queue: VecDeque<ClientId>,
}

impl Roster {
    pub fn new() -> Self {
        Roster {
            entries: Vec::new(),
            players: enum_map! { _ => None },
            viewer_queue: VecDeque::new(),
        }
    }

    pub fn contains(&self, id: ClientId) -> bool { self.get(id).is_some() }
    pub fn get(&self, id: ClientId) -> Option<&Participant> {
        self.entries.iter().find(|(entry_id, _)| *entry_id == id).map(|(_, p)| p)
    }
    pub fn role(&self, id: ClientId) -> Option<Role> { self.get(id).map(|p| p.role) }
    pub fn player(&self, color: Color) -> Option<ClientId> { self.players[color] }
    pub fn num_players(&self) -> usize { self.players.values().flatten().count() }
    pub fn viewer_queue(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.viewer_queue.iter().copied()
    }
    pub fn participants(&self) -> Vec<Participant> {
        self.entries.iter().map(|(_, p)| p.clone()).collect()
    }

    // Panics if `id` has already joined.
    pub fn join(&mut self, id: ClientId, name: String) -> JoinOutcome {
        ensure_invariant!(!self.contains(id), "{id:?} joined twice");
        let outcome = match (self.players[Color::Black], self.players[Color::White]) {
            (None, None) => JoinOutcome {
                role: Role::Player(Color::Black),
                recolored: None,
                match_started: false,
            },
            (Some(_), None) => JoinOutcome {
                role: Role::Player(Color::White),
                recolored: None,
                match_started: true,
            },
            (None, Some(white_id)) => {
                // The earlier player keeps priority for Black.
                self.set_player_color(white_id, Color::Black);
                JoinOutcome {
                    role: Role::Player(Color::White),
                    recolored: Some((white_id, Color::Black)),
                    match_started: true,
                }
            }
            (Some(_), Some(_)) => JoinOutcome {
                role: Role::Viewer,
                recolored: None,
                match_started: false,
            },
        };
        match outcome.role {
            Role::Player(color) => self.players[color] = Some(id),
            Role::Viewer => self.viewer_queue.push_back(id),
        }
        self.entries.push((id, Participant { name, role: outcome.role }));
        self.check_invariants();
        outcome
    }

    // Returns `None` if `id` has never joined.
    pub fn leave(&mut self, id: ClientId) -> Option<LeaveOutcome> {
        let index = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        let (_, participant) = self.entries.remove(index);
        let mut recolored = None;
        let mut promoted = None;
        match participant.role {
            Role::Viewer => {
                self.viewer_queue.retain(|&viewer_id| viewer_id != id);
            }
            Role::Player(color) => {
                self.players[color] = None;
                if let (None, Some(white_id)) =
                    (self.players[Color::Black], self.players[Color::White])
                {
                    self.set_player_color(white_id, Color::Black);
                    recolored = Some((white_id, Color::Black));
                }
                if let Some(viewer_id) = self.viewer_queue.pop_front() {
                    let color = self.first_free_color().unwrap_or_else(|| {
                        panic!("{}", internal_error_message!("no free slot after a player left"))
                    });
                    self.set_role(viewer_id, Role::Player(color));
                    self.players[color] = Some(viewer_id);
                    promoted = Some((viewer_id, color));
                }
            }
        }
        self.check_invariants();
        Some(LeaveOutcome { participant, recolored, promoted })
    }

    fn first_free_color(&self) -> Option<Color> {
        Color::iter().find(|&color| self.players[color].is_none())
    }

    fn set_player_color(&mut self, id: ClientId, new_color: Color) {
        let Some(Role::Player(old_color)) = self.role(id) else {
            panic!("{}", internal_error_message!("{id:?} is not a player"));
        };
        ensure_invariant!(self.players[old_color] == Some(id));
        self.players[old_color] = None;
        self.players[new_color] = Some(id);
        self.set_role(id, Role::Player(new_color));
    }

    fn set_role(&mut self, id: ClientId, role: Role) {
        let (_, participant) = self
            .entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .unwrap_or_else(|| panic!("{}", internal_error_message!("{id:?} not found")));
        participant.role = role;
    }

    // A breach here is a bug in this module, never a client error.
    fn check_invariants(&self) {
        let players = self
            .entries
            .iter()
            .filter_map(|(id, p)| p.role.color().map(|color| (color, *id)))
            .collect_vec();
        ensure_invariant!(players.len() <= TOTAL_PLAYERS, "too many players: {players:?}");
        ensure_invariant!(
            players.iter().map(|(color, _)| color).all_unique(),
            "duplicate colors: {players:?}"
        );
        for (color, id) in &players {
            ensure_invariant!(self.players[*color] == Some(*id));
        }
        ensure_invariant!(self.num_players() == players.len());
        let viewers = self
            .entries
            .iter()
            .filter(|(_, p)| p.role == Role::Viewer)
            .map(|(id, _)| *id)
            .sorted()
            .collect_vec();
        ensure_invariant!(
            self.viewer_queue.iter().copied().sorted().collect_vec() == viewers,
            "viewer queue out of sync"
        );
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use Color::{Black, White};

    fn id(n: usize) -> ClientId { ClientId::from_raw(n) }

    fn roles(roster: &Roster) -> Vec<(String, Role)> {
        roster.participants().into_iter().map(|p| (p.name, p.role)).collect()
    }

    #[test]
    fn first_two_play_rest_watch() {
        let mut roster = Roster::new();
        let a = roster.join(id(1), "a".to_owned());
        assert_eq!(a.role, Role::Player(Black));
        assert!(!a.match_started);
        let b = roster.join(id(2), "b".to_owned());
        assert_eq!(b.role, Role::Player(White));
        assert!(b.match_started);
        assert_eq!(b.recolored, None);
        let c = roster.join(id(3), "c".to_owned());
        assert_eq!(c.role, Role::Viewer);
        assert!(!c.match_started);
        assert_eq!(roster.num_players(), 2);
        assert_eq!(roster.viewer_queue().collect_vec(), vec![id(3)]);
    }

    #[test]
    fn black_leaves_white_recolored_viewer_promoted() {
        let mut roster = Roster::new();
        roster.join(id(1), "a".to_owned());
        roster.join(id(2), "b".to_owned());
        roster.join(id(3), "c".to_owned());
        roster.join(id(4), "d".to_owned());
        let outcome = roster.leave(id(1)).unwrap();
        assert_eq!(outcome.participant.name, "a");
        assert_eq!(outcome.recolored, Some((id(2), Black)));
        assert_eq!(outcome.promoted, Some((id(3), White)));
        assert_eq!(roles(&roster), vec![
            ("b".to_owned(), Role::Player(Black)),
            ("c".to_owned(), Role::Player(White)),
            ("d".to_owned(), Role::Viewer),
        ]);
        assert_eq!(roster.viewer_queue().collect_vec(), vec![id(4)]);
    }

    #[test]
    fn white_leaves_viewer_takes_white() {
        let mut roster = Roster::new();
        roster.join(id(1), "a".to_owned());
        roster.join(id(2), "b".to_owned());
        roster.join(id(3), "c".to_owned());
        let outcome = roster.leave(id(2)).unwrap();
        assert_eq!(outcome.recolored, None);
        assert_eq!(outcome.promoted, Some((id(3), White)));
        assert_eq!(roster.player(Black), Some(id(1)));
        assert_eq!(roster.player(White), Some(id(3)));
    }

    #[test]
    fn last_player_leaves_viewer_takes_black() {
        let mut roster = Roster::new();
        roster.join(id(1), "a".to_owned());
        roster.join(id(2), "b".to_owned());
        roster.join(id(3), "c".to_owned());
        roster.join(id(4), "d".to_owned());
        roster.leave(id(3)).unwrap();
        roster.leave(id(1)).unwrap();
        // "b" is Black now, "d" got White.
        let outcome = roster.leave(id(2)).unwrap();
        assert_eq!(outcome.recolored, Some((id(4), Black)));
        assert_eq!(outcome.promoted, None);
        roster.leave(id(4)).unwrap();
        assert_eq!(roster.num_players(), 0);

        roster.join(id(5), "e".to_owned());
        assert_eq!(roster.role(id(5)), Some(Role::Player(Black)));
    }

    #[test]
    fn viewer_leaving_keeps_queue_order() {
        let mut roster = Roster::new();
        for n in 1..=5 {
            roster.join(id(n), n.to_string());
        }
        let outcome = roster.leave(id(4)).unwrap();
        assert_eq!(outcome.recolored, None);
        assert_eq!(outcome.promoted, None);
        assert_eq!(roster.viewer_queue().collect_vec(), vec![id(3), id(5)]);
        roster.leave(id(2)).unwrap();
        assert_eq!(roster.role(id(3)), Some(Role::Player(White)));
        assert_eq!(roster.viewer_queue().collect_vec(), vec![id(5)]);
    }

    #[test]
    fn second_player_recolors_lone_white() {
        // Lone White cannot be produced through the public API alone, because a remaining White
        // is always recolored on leave. Build it by hand.
        let mut roster = Roster::new();
        roster.join(id(1), "a".to_owned());
        roster.set_player_color(id(1), White);
        let outcome = roster.join(id(2), "b".to_owned());
        assert_eq!(outcome.role, Role::Player(White));
        assert_eq!(outcome.recolored, Some((id(1), Black)));
        assert!(outcome.match_started);
        assert_eq!(roster.role(id(1)), Some(Role::Player(Black)));
    }

    #[test]
    fn unknown_leave() {
        let mut roster = Roster::new();
        assert_eq!(roster.leave(id(1)), None);
    }
}
