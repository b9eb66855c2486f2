mod support;

use std::time::Duration;

use futures::SinkExt;
use sunrise_shooter_server::config::Config;
use sunrise_shooter_server::game::constants::{GROUND_Y, SCREEN_WIDTH};
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn two_clients_share_one_world() {
    let addr = support::start_server().await;
    let mut a = support::connect(addr, Some("a")).await;
    let mut b = support::connect(addr, Some("b")).await;

    let state = support::wait_for(&mut b, |s| s.players.len() == 2).await;
    assert!(state.players.contains_key("a"));
    assert!(state.players.contains_key("b"));
    assert_eq!(state.players["a"].y, GROUND_Y);

    a.close(None).await.expect("close a");

    let state = support::wait_for(&mut b, |s| s.players.len() == 1).await;
    assert!(state.players.contains_key("b"));
}

#[tokio::test]
async fn missing_id_falls_back_to_remote_address() {
    let addr = support::start_server().await;
    let mut ws = support::connect(addr, None).await;

    let state = support::wait_for(&mut ws, |s| s.players.len() == 1).await;
    let id = state.players.keys().next().cloned().unwrap_or_default();
    assert!(id.starts_with("127.0.0.1:"), "unexpected id {id}");
}

#[tokio::test]
async fn jump_and_shoot_show_up_in_snapshots() {
    let addr = support::start_server().await;
    let mut ws = support::connect(addr, Some("jumper")).await;
    support::wait_for(&mut ws, |s| s.players.contains_key("jumper")).await;

    support::send_command(&mut ws, "jumper", "shoot").await;
    let state = support::wait_for(&mut ws, |s| !s.bullets.is_empty()).await;
    assert!(state.bullets[0].vx > 0.0);

    support::send_command(&mut ws, "jumper", "jump").await;
    support::wait_for(&mut ws, |s| s.players["jumper"].y < GROUND_Y).await;
}

#[tokio::test]
async fn malformed_messages_do_not_drop_the_connection() {
    let addr = support::start_server().await;
    let mut ws = support::connect(addr, Some("p")).await;
    support::wait_for(&mut ws, |s| s.players.contains_key("p")).await;

    ws.send(Message::Text("{not json".into())).await.expect("send");
    ws.send(Message::Text(r#"{"type":"command","playerId":"p","command":"fly"}"#.into()))
        .await
        .expect("send");

    support::send_command(&mut ws, "p", "jump").await;
    support::wait_for(&mut ws, |s| s.players["p"].y < GROUND_Y).await;
}

#[tokio::test]
async fn reset_restarts_the_round() {
    let addr = support::start_server().await;
    let mut ws = support::connect(addr, Some("r")).await;
    support::wait_for(&mut ws, |s| s.players.contains_key("r")).await;

    support::send_command(&mut ws, "r", "shoot").await;
    support::wait_for(&mut ws, |s| !s.bullets.is_empty()).await;

    support::send_command(&mut ws, "r", "reset").await;
    let state = support::wait_for(&mut ws, |s| s.players["r"].y < 0.0).await;
    assert_eq!(state.points, 0);
    assert_eq!(state.level, 1);
    assert!(!state.game_over);
    assert!(state.bullets.is_empty());
    assert!(state.enemies.len() <= 1);
    assert!(state.enemies.iter().all(|e| e.x > SCREEN_WIDTH));

    // The dropped-in player lands on the ground again
    support::wait_for(&mut ws, |s| s.players["r"].y == GROUND_Y).await;
}

#[tokio::test]
async fn replaced_connection_can_no_longer_steer_the_player() {
    let addr = support::start_server().await;
    let mut old = support::connect(addr, Some("dup")).await;
    support::wait_for(&mut old, |s| s.players.contains_key("dup")).await;

    let mut new = support::connect(addr, Some("dup")).await;
    support::wait_for(&mut new, |s| s.players.contains_key("dup")).await;

    // The old socket may already be gone, so a failed send is fine here
    let reset = r#"{"type":"command","command":"reset"}"#;
    let _ = old.send(Message::Text(reset.into())).await;
    support::wait_for_close(&mut old).await;

    for _ in 0..30 {
        let state = support::next_snapshot(&mut new).await;
        assert_eq!(state.players["dup"].y, GROUND_Y);
    }

    // The live connection still drives it
    support::send_command(&mut new, "dup", "jump").await;
    support::wait_for(&mut new, |s| s.players["dup"].y < GROUND_Y).await;
}

#[tokio::test]
async fn silent_client_is_dropped_after_timeout() {
    let addr = support::start_server_with(Config {
        world_seed: Some(11),
        ping_interval: Duration::from_secs(1),
        client_timeout: Duration::from_secs(2),
        ..Config::default()
    })
    .await;

    let mut watcher = support::connect(addr, Some("watcher")).await;
    let silent = support::connect(addr, Some("silent")).await;
    support::wait_for(&mut watcher, |s| s.players.contains_key("silent")).await;

    // The watcher answers pings while reading, the silent client never reads
    let state = support::wait_for_within(&mut watcher, Duration::from_secs(5), |s| {
        !s.players.contains_key("silent")
    })
    .await;
    assert!(state.players.contains_key("watcher"));

    drop(silent);
}
