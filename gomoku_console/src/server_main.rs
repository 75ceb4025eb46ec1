// Networking around `ServerState`: connections are accepted and read concurrently, while all
// game state mutations happen on a single thread that drains `IncomingEvent`s.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use anyhow::Context;
use async_tungstenite::WebSocketStream;
use futures_io::{AsyncRead, AsyncWrite};
use futures_util::StreamExt;
use gomoku_online::server::*;
use log::{error, info, warn};
use tide::StatusCode;
use tungstenite::{handshake, protocol};

use crate::network::{self, CommunicationError};
use crate::server_config::{AllowedOrigin, ServerConfig};

// Limited buffer for data streaming from clients into the server. When this is full, we start
// putting back pressure on client websockets.
const INCOMING_EVENT_QUEUE_SIZE: usize = 10000;

async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static>(
    peer_addr: String, stream: WebSocketStream<S>, tx: mpsc::SyncSender<IncomingEvent>,
    clients: Arc<Mutex<Clients>>,
) {
    let (mut stream_tx, mut stream_rx) = stream.split();
    let (client_tx, client_rx) = async_std::channel::unbounded();
    let client_id = clients.lock().unwrap().add_client(client_tx, peer_addr.clone());
    info!("Client {peer_addr} connected as {client_id:?}");
    if tx.send(IncomingEvent::Connect(client_id)).is_err() {
        return;
    }

    // Client -> Server
    let tx_reader = tx.clone();
    async_std::task::spawn(async move {
        loop {
            match network::read_obj_async(&mut stream_rx).await {
                Ok(ev) => {
                    if tx_reader.send(IncomingEvent::Network(client_id, ev)).is_err() {
                        break;
                    }
                }
                Err(CommunicationError::Serde(err)) => {
                    warn!("Ignoring malformed message from {client_id:?}: {err}");
                }
                Err(err) => {
                    match err {
                        CommunicationError::ConnectionClosed => {
                            info!("Client {client_id:?} closed the connection")
                        }
                        err => warn!("Client {client_id:?} dropped due to read error: {err:?}"),
                    }
                    let _ = tx_reader.send(IncomingEvent::Disconnect(client_id));
                    break;
                }
            }
        }
    });

    // Server -> Client. Ends when the server removes the client, which drops the sender.
    while let Ok(ev) = client_rx.recv().await {
        if let Err(err) = network::write_obj_async(&mut stream_tx, &ev).await {
            warn!("Client {client_id:?} dropped due to write error: {err:?}");
            let _ = tx.send(IncomingEvent::Disconnect(client_id));
            break;
        }
    }
}

#[derive(Clone)]
struct HttpServerState {
    clients: Arc<Mutex<Clients>>,
    tx: mpsc::SyncSender<IncomingEvent>,
    allowed_origin: AllowedOrigin,
}

async fn handle_websocket(
    req: tide::Request<HttpServerState>,
) -> tide::Result<http_types::Response> {
    check_origin(&req, &req.state().allowed_origin)?;
    let peer_addr = req.peer_addr().map_or_else(
        || Err(tide::Error::from_str(StatusCode::Forbidden, "Peer address missing")),
        |x| Ok(x.to_owned()),
    )?;
    let key = req
        .header("Sec-WebSocket-Key")
        .map(|values| values.last().as_str().to_owned())
        .ok_or_else(|| {
            tide::Error::from_str(StatusCode::BadRequest, "Expected a websocket upgrade")
        })?;
    let HttpServerState { clients, tx, .. } = req.state().clone();

    let mut http_types_resp = http_types::Response::new(StatusCode::SwitchingProtocols);
    http_types_resp.insert_header(http_types::headers::UPGRADE, "websocket");
    http_types_resp.insert_header(http_types::headers::CONNECTION, "Upgrade");
    http_types_resp
        .insert_header("Sec-WebSocket-Accept", handshake::derive_accept_key(key.as_bytes()));

    // http_types::Response is a magic thing that can give us the stream back
    // once it's upgraded.
    let upgrade_receiver = http_types_resp.recv_upgrade().await;

    async_std::task::spawn(async move {
        if let Some(stream) = upgrade_receiver.await {
            let stream =
                WebSocketStream::from_raw_socket(stream, protocol::Role::Server, None).await;
            handle_connection(peer_addr, stream, tx, clients).await;
        } else {
            error!("Never received an upgrade for client {peer_addr}");
        }
    });
    Ok(http_types_resp)
}

async fn handle_server_info(req: tide::Request<HttpServerState>) -> tide::Result<String> {
    let num_clients = req.state().clients.lock().unwrap().len();
    Ok(format!("Connected clients: {num_clients}\n"))
}

fn run_tide(
    config: ServerConfig, clients: Arc<Mutex<Clients>>, tx: mpsc::SyncSender<IncomingEvent>,
) -> anyhow::Result<()> {
    let mut app = tide::with_state(HttpServerState {
        clients,
        tx,
        allowed_origin: config.allowed_origin.clone(),
    });
    app.at("/").get(handle_websocket);
    app.at("/dyn/server").get(handle_server_info);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Listening on {address}");
    async_std::task::block_on(app.listen(address.clone()))
        .with_context(|| format!("Failed to start the tide server on {address}"))
}

fn check_origin<T>(req: &tide::Request<T>, allowed_origin: &AllowedOrigin) -> tide::Result<()> {
    let origin = req.header(http_types::headers::ORIGIN).map(|values| values.last().as_str());
    if allowed_origin.allows(origin) {
        Ok(())
    } else {
        Err(tide::Error::from_str(
            StatusCode::Forbidden,
            format!("Origin {origin:?} is not allowed"),
        ))
    }
}

pub fn run(config: ServerConfig) -> anyhow::Result<()> {
    let options = ServerOptions {
        allow_turn_override: config.allow_turn_override,
    };

    let (tx, rx) = mpsc::sync_channel(INCOMING_EVENT_QUEUE_SIZE);
    let tx_terminate = tx.clone();
    let clients = Arc::new(Mutex::new(Clients::new()));
    let clients_copy = Arc::clone(&clients);

    ctrlc::set_handler(move || {
        let _ = tx_terminate.send(IncomingEvent::Terminate);
    })
    .context("Error setting Ctrl-C handler")?;

    thread::spawn(move || {
        let mut server_state = ServerState::new(options, clients_copy);
        for event in rx {
            server_state.apply_event(event);
            if server_state.is_terminating() {
                std::process::exit(0);
            }
        }
        panic!("Unexpected end of events stream");
    });

    run_tide(config, clients, tx)
}
