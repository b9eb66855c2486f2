//! WebSocket upgrade handler

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, Query, State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::commands::{apply_command, CommandOutcome};
use crate::ws::protocol::ClientMsg;
use crate::ws::registry::{Payload, Registration};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Player identifier chosen by the client
    #[serde(default)]
    pub id: Option<String>,
}

/// Why a connection's read loop ended
#[derive(Debug)]
enum Disconnect {
    Closed,
    Idle(Duration),
    /// Writer ended: socket send failed or another connection took the id
    WriterStopped,
    ReadFailed(axum::Error),
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    let player_id = player_id_for(query.id, addr);
    ws.on_upgrade(move |socket| handle_socket(socket, player_id, state))
}

/// The client-supplied id, or the remote address when none was given
fn player_id_for(requested: Option<String>, addr: SocketAddr) -> String {
    requested
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| addr.to_string())
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, player_id: String, state: AppState) {
    let (tx, rx) = mpsc::channel::<Payload>(state.config.client_buffer);
    let registration = Registration::new(state.clients.clone(), player_id, tx);
    let player_id = registration.player_id().to_string();
    let connection_id = registration.connection_id();

    info!(
        player_id = %player_id,
        connection_id = %connection_id,
        clients = state.clients.len(),
        "Client connected"
    );

    let (ws_sink, ws_stream) = socket.split();

    let mut writer = tokio::spawn(write_loop(
        ws_sink,
        rx,
        state.config.ping_interval,
        player_id.clone(),
    ));

    let session = Session {
        state: &state,
        player_id: &player_id,
        connection_id,
    };
    let reason = read_loop(ws_stream, &mut writer, session, state.config.client_timeout).await;

    writer.abort();
    drop(registration);

    match reason {
        Disconnect::Closed => info!(player_id = %player_id, "Client disconnected"),
        Disconnect::WriterStopped => info!(player_id = %player_id, "Client writer stopped"),
        Disconnect::Idle(after) => info!(
            player_id = %player_id,
            idle_secs = after.as_secs(),
            "Client timed out"
        ),
        Disconnect::ReadFailed(e) => info!(
            player_id = %player_id,
            error = %e,
            "Client read failed"
        ),
    }
}

/// Who a reader is acting for
#[derive(Clone, Copy)]
struct Session<'a> {
    state: &'a AppState,
    player_id: &'a str,
    connection_id: Uuid,
}

/// Reader loop: WebSocket -> command processor. Ends with the writer, so a
/// replaced connection stops reading as soon as its channel is dropped.
async fn read_loop(
    mut ws_stream: SplitStream<WebSocket>,
    writer: &mut JoinHandle<()>,
    session: Session<'_>,
    idle_limit: Duration,
) -> Disconnect {
    let player_id = session.player_id;
    loop {
        let next = tokio::select! {
            biased;
            _ = &mut *writer => return Disconnect::WriterStopped,
            next = timeout(idle_limit, ws_stream.next()) => next,
        };

        let message = match next {
            Err(_) => return Disconnect::Idle(idle_limit),
            Ok(None) => return Disconnect::Closed,
            Ok(Some(Err(e))) => return Disconnect::ReadFailed(e),
            Ok(Some(Ok(message))) => message,
        };

        match message {
            Message::Text(text) => handle_text(session, &text),
            Message::Binary(_) => {
                warn!(player_id = %player_id, "Received binary message, ignoring");
            }
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => return Disconnect::Closed,
        }
    }
}

/// Decode one message and apply it. Bad payloads are dropped, never fatal.
fn handle_text(session: Session<'_>, text: &str) {
    let Session {
        state,
        player_id,
        connection_id,
    } = session;

    let command = match ClientMsg::parse(text).and_then(|msg| msg.into_command(player_id)) {
        Ok(command) => command,
        Err(e) => {
            warn!(player_id = %player_id, error = %e, "Discarding client message");
            return;
        }
    };

    if !state.clients.owns(player_id, connection_id) {
        debug!(player_id = %player_id, %connection_id, "Stale connection, dropping command");
        return;
    }

    let outcome = apply_command(&mut state.world.lock(), player_id, command);
    if outcome == CommandOutcome::Applied {
        debug!(player_id = %player_id, ?command, "Command applied");
    }
}

/// Writer loop: snapshots and keepalive pings -> WebSocket
async fn write_loop(
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Payload>,
    ping_every: Duration,
    player_id: String,
) {
    let mut ping = interval(ping_every);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ping.tick().await;

    loop {
        let result = tokio::select! {
            payload = rx.recv() => match payload {
                Some(payload) => ws_sink.send(Message::Text(payload.to_string())).await,
                None => break,
            },
            _ = ping.tick() => ws_sink.send(Message::Ping(Vec::new())).await,
        };

        if let Err(e) = result {
            warn!(player_id = %player_id, error = %e, "WebSocket send failed");
            break;
        }
    }
}
