//! Sunrise Shooter Server - authoritative multiplayer side-scroller server
//!
//! One fixed-rate tick loop owns the simulation; every connected client
//! receives the full world state once per tick over a WebSocket and sends
//! back discrete commands.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::app::AppState;
use crate::config::Config;
use crate::http::build_router;

/// Serve on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, config: Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(config);

    let game_loop = tokio::spawn(state.game_loop().run());

    let router = build_router(state);
    let result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await;

    game_loop.abort();
    info!("Game loop stopped");
    Ok(result?)
}

/// Serve on `listener` until the process exits
pub async fn run(listener: TcpListener, config: Config) -> anyhow::Result<()> {
    serve(listener, config, std::future::pending()).await
}
