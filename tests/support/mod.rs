// Shared helpers for booting a server per test and talking to it as a client.
use std::{net::SocketAddr, time::Duration};

use futures::{SinkExt, StreamExt};
use sunrise_shooter_server::{config::Config, game::snapshot, game::WorldState};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

// How long any single expectation may take before the test fails.
const WAIT: Duration = Duration::from_secs(3);

// Start a server on an ephemeral port inside the current test runtime.
pub async fn start_server() -> SocketAddr {
    start_server_with(Config {
        world_seed: Some(11),
        ..Config::default()
    })
    .await
}

// Same as `start_server`, with the caller's configuration.
pub async fn start_server_with(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        sunrise_shooter_server::run(listener, config)
            .await
            .expect("server failed");
    });
    addr
}

// Open a game connection, optionally with an explicit player id.
pub async fn connect(addr: SocketAddr, id: Option<&str>) -> WsClient {
    let url = match id {
        Some(id) => format!("ws://{addr}/ws?id={id}"),
        None => format!("ws://{addr}/ws"),
    };
    let (ws, _) = connect_async(url).await.expect("websocket connect");
    ws
}

// Send a command message for `player_id`.
pub async fn send_command(ws: &mut WsClient, player_id: &str, command: &str) {
    let msg = serde_json::json!({"type": "command", "playerId": player_id, "command": command});
    ws.send(Message::Text(msg.to_string()))
        .await
        .expect("send command");
}

// Read the next snapshot, skipping control frames.
pub async fn next_snapshot(ws: &mut WsClient) -> WorldState {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                return snapshot::decode(&text).expect("snapshot should decode")
            }
            Some(Ok(_)) => continue,
            other => panic!("connection ended while waiting for snapshot: {other:?}"),
        }
    }
}

// Keep reading snapshots until one satisfies `pred`.
pub async fn wait_for<F>(ws: &mut WsClient, pred: F) -> WorldState
where
    F: FnMut(&WorldState) -> bool,
{
    wait_for_within(ws, WAIT, pred).await
}

// `wait_for` with an explicit deadline.
pub async fn wait_for_within<F>(ws: &mut WsClient, limit: Duration, mut pred: F) -> WorldState
where
    F: FnMut(&WorldState) -> bool,
{
    tokio::time::timeout(limit, async {
        loop {
            let state = next_snapshot(ws).await;
            if pred(&state) {
                return state;
            }
        }
    })
    .await
    .expect("expected snapshot did not arrive in time")
}

// Drain frames until the server ends the connection.
pub async fn wait_for_close(ws: &mut WsClient) {
    tokio::time::timeout(WAIT, async {
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    })
    .await
    .expect("server did not end the connection in time")
}
