use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::board::{Board, MoveError, MoveOutcome};
use crate::color::Color;
use crate::coord::Coord;
use crate::event::{GomokuClientEvent, GomokuServerEvent};
use crate::participant::Role;
use crate::roster::Roster;


#[derive(Debug)]
pub enum IncomingEvent {
    // A new connection has been registered in `Clients`.
    Connect(ClientId),
    Network(ClientId, GomokuClientEvent),
    // The connection is gone. May arrive more than once for the same client.
    Disconnect(ClientId),
    Terminate,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClientId(usize);

impl ClientId {
    pub fn from_raw(id: usize) -> Self { ClientId(id) }
}

pub struct Client {
    events_tx: async_std::channel::Sender<GomokuServerEvent>,
    logging_id: String,
}

impl Client {
    // Delivery is fire-and-forget: if the connection is already closing, the message is lost,
    // and the disconnect will be processed separately.
    fn send(&self, event: GomokuServerEvent) { let _ = self.events_tx.try_send(event); }
}

pub struct Clients {
    map: HashMap<ClientId, Client>,
    next_id: usize,
}

impl Clients {
    pub fn new() -> Self { Clients { map: HashMap::new(), next_id: 1 } }

    pub fn add_client(
        &mut self, events_tx: async_std::channel::Sender<GomokuServerEvent>, logging_id: String,
    ) -> ClientId {
        let id = ClientId(self.next_id);
        self.next_id += 1;
        let logging_id = format!("{logging_id} ({})", id.0);
        self.map.insert(id, Client { events_tx, logging_id });
        id
    }

    // Returns client logging id if the client existed.
    pub fn remove_client(&mut self, id: ClientId) -> Option<String> {
        self.map.remove(&id).map(|client| client.logging_id)
    }

    pub fn contains(&self, id: ClientId) -> bool { self.map.contains_key(&id) }
    pub fn len(&self) -> usize { self.map.len() }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    fn logging_id(&self, id: ClientId) -> String {
        self.map.get(&id).map_or_else(|| format!("{id:?}"), |client| client.logging_id.clone())
    }

    fn send(&self, id: ClientId, event: GomokuServerEvent) {
        if let Some(client) = self.map.get(&id) {
            client.send(event);
        }
    }

    fn broadcast(&self, event: &GomokuServerEvent) {
        for client in self.map.values() {
            client.send(event.clone());
        }
    }
}


#[derive(Clone, Debug)]
pub struct ServerOptions {
    // Whether `SetTurn` from a player is honored.
    pub allow_turn_override: bool,
}

impl Default for ServerOptions {
    fn default() -> Self { ServerOptions { allow_turn_override: true } }
}

// The single authority over the game. All mutations go through `apply_event`, which must be
// called from one thread at a time.
pub struct ServerState {
    options: ServerOptions,
    clients: Arc<Mutex<Clients>>,
    roster: Roster,
    board: Board,
    terminating: bool,
}

impl ServerState {
    pub fn new(options: ServerOptions, clients: Arc<Mutex<Clients>>) -> Self {
        ServerState {
            options,
            clients,
            roster: Roster::new(),
            board: Board::new(),
            terminating: false,
        }
    }

    pub fn roster(&self) -> &Roster { &self.roster }
    pub fn board(&self) -> &Board { &self.board }
    pub fn is_terminating(&self) -> bool { self.terminating }

    pub fn apply_event(&mut self, event: IncomingEvent) {
        let clients = Arc::clone(&self.clients);
        let mut clients = clients.lock().unwrap();
        match event {
            IncomingEvent::Connect(client_id) => {
                self.process_connect(&clients, client_id);
            }
            IncomingEvent::Network(client_id, event) => {
                if !clients.contains(client_id) {
                    // Events can still be in the queue after the client has been removed.
                    debug!("Ignoring {event:?} from removed client {client_id:?}");
                    return;
                }
                self.process_client_event(&clients, client_id, event);
            }
            IncomingEvent::Disconnect(client_id) => {
                self.process_disconnect(&mut clients, client_id);
            }
            IncomingEvent::Terminate => {
                info!("Terminating with {} clients connected", clients.len());
                self.terminating = true;
            }
        }
    }

    fn process_client_event(
        &mut self, clients: &Clients, client_id: ClientId, event: GomokuClientEvent,
    ) {
        match event {
            GomokuClientEvent::Join { player_name } => {
                self.process_join(clients, client_id, player_name)
            }
            GomokuClientEvent::MakeMove { row, col } => {
                self.process_make_move(clients, client_id, row, col)
            }
            GomokuClientEvent::ClearBoard => self.process_clear_board(clients, client_id),
            GomokuClientEvent::SetTurn { color } => {
                self.process_set_turn(clients, client_id, color)
            }
            GomokuClientEvent::Ping => clients.send(client_id, GomokuServerEvent::Pong),
        }
    }

    // Gives a fresh connection something to display before it joins. Anything broadcast between
    // registration and this point is already reflected in the snapshot.
    fn process_connect(&mut self, clients: &Clients, client_id: ClientId) {
        if !clients.contains(client_id) {
            return;
        }
        clients.send(client_id, GomokuServerEvent::InitialBoardState {
            grid: self.board.grid().to_rows(),
        });
        clients.send(client_id, GomokuServerEvent::TurnUpdate {
            color: self.board.active_color(),
        });
        clients.send(client_id, GomokuServerEvent::RosterUpdate {
            participants: self.roster.participants(),
        });
    }

    fn process_join(&mut self, clients: &Clients, client_id: ClientId, player_name: String) {
        let player_name = player_name.trim().to_owned();
        if player_name.is_empty() {
            warn!("Client {} tried to join with an empty name", clients.logging_id(client_id));
            return;
        }
        if let Some(existing) = self.roster.get(client_id) {
            warn!(
                "Client {} tried to join as {:?}, but is already in as {:?}",
                clients.logging_id(client_id),
                player_name,
                existing.name
            );
            return;
        }

        let outcome = self.roster.join(client_id, player_name.clone());
        info!(
            "Client {} joined as {:?} with role {:?}",
            clients.logging_id(client_id),
            player_name,
            outcome.role
        );
        if let Some((recolored_id, color)) = outcome.recolored {
            info!("Client {} recolored to {color:?}", clients.logging_id(recolored_id));
            clients.send(recolored_id, GomokuServerEvent::RoleAssignment {
                role: Role::Player(color),
            });
        }
        if outcome.match_started {
            info!("Both players are in. Starting a new game");
            self.reset_board(clients);
        }

        clients.send(client_id, GomokuServerEvent::InitialBoardState {
            grid: self.board.grid().to_rows(),
        });
        clients.send(client_id, GomokuServerEvent::RoleAssignment { role: outcome.role });
        self.broadcast_roster(clients);
        clients.send(client_id, GomokuServerEvent::TurnUpdate {
            color: self.board.active_color(),
        });
    }

    fn process_make_move(&mut self, clients: &Clients, client_id: ClientId, row: i64, col: i64) {
        let Some(Role::Player(color)) = self.roster.role(client_id) else {
            debug!("Move from non-player {} ignored", clients.logging_id(client_id));
            return;
        };
        if color != self.board.active_color() {
            debug!("Out-of-turn move from {color:?} ignored");
            return;
        }
        let pos = match Coord::try_from_zero_based(row, col) {
            Ok(pos) => pos,
            Err(err) => {
                debug!("Move from {color:?} ignored: {err}");
                return;
            }
        };
        let outcome = match self.board.try_place(color, pos) {
            Ok(outcome) => outcome,
            Err(MoveError::WrongTurnOrder) => {
                // Checked above.
                debug!("Out-of-turn move from {color:?} ignored");
                return;
            }
            Err(MoveError::GameOver) => {
                debug!("Move from {color:?} after the game has ended ignored");
                return;
            }
        };

        clients.broadcast(&GomokuServerEvent::CellUpdate {
            row: pos.row.to_zero_based(),
            col: pos.col.to_zero_based(),
            color,
        });
        match outcome {
            MoveOutcome::Victory { winner, orientation } => {
                info!("{winner:?} won with a {orientation:?} line through {pos:?}");
                clients.broadcast(&GomokuServerEvent::GameOutcome { winner });
            }
            MoveOutcome::NextTurn(next) => {
                clients.broadcast(&GomokuServerEvent::TurnUpdate { color: next });
            }
        }
    }

    fn process_clear_board(&mut self, clients: &Clients, client_id: ClientId) {
        if !self.is_player(client_id) {
            debug!("Clear request from non-player {} ignored", clients.logging_id(client_id));
            return;
        }
        info!("Board cleared by {}", clients.logging_id(client_id));
        self.reset_board(clients);
    }

    fn process_set_turn(&mut self, clients: &Clients, client_id: ClientId, color: Color) {
        if !self.options.allow_turn_override {
            debug!("Turn override from {} ignored: disabled", clients.logging_id(client_id));
            return;
        }
        if !self.is_player(client_id) {
            debug!("Turn override from non-player {} ignored", clients.logging_id(client_id));
            return;
        }
        self.board.set_active_color(color);
        clients.broadcast(&GomokuServerEvent::TurnUpdate { color });
    }

    fn process_disconnect(&mut self, clients: &mut Clients, client_id: ClientId) {
        if let Some(logging_id) = clients.remove_client(client_id) {
            info!("Client {logging_id} disconnected");
        }
        let Some(outcome) = self.roster.leave(client_id) else {
            return;
        };
        info!("{:?} left ({:?})", outcome.participant.name, outcome.participant.role);
        if let Some((recolored_id, color)) = outcome.recolored {
            info!("Client {} recolored to {color:?}", clients.logging_id(recolored_id));
            clients.send(recolored_id, GomokuServerEvent::RoleAssignment {
                role: Role::Player(color),
            });
            self.board.set_active_color(Color::FIRST_TO_MOVE);
            clients.broadcast(&GomokuServerEvent::TurnUpdate { color: Color::FIRST_TO_MOVE });
        }
        if let Some((promoted_id, color)) = outcome.promoted {
            info!("Client {} promoted to {color:?} player", clients.logging_id(promoted_id));
            clients.send(promoted_id, GomokuServerEvent::RoleAssignment {
                role: Role::Player(color),
            });
            self.reset_board(clients);
        }
        self.broadcast_roster(clients);
    }

    fn is_player(&self, client_id: ClientId) -> bool {
        self.roster.role(client_id).is_some_and(Role::is_player)
    }

    fn reset_board(&mut self, clients: &Clients) {
        self.board.reset();
        clients.broadcast(&GomokuServerEvent::BoardCleared);
        clients.broadcast(&GomokuServerEvent::TurnUpdate { color: self.board.active_color() });
    }

    fn broadcast_roster(&self, clients: &Clients) {
        clients.broadcast(&GomokuServerEvent::RosterUpdate {
            participants: self.roster.participants(),
        });
    }
}
