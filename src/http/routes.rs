//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.client_origin))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// "*" allows any origin, otherwise a comma-separated list
fn allowed_origins(raw: &str) -> AllowOrigin {
    if raw.trim() == "*" {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    AllowOrigin::list(origins)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    tick: u64,
    players: usize,
    clients: usize,
    snapshot_bytes: u64,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (tick, players) = {
        let world = state.world.lock();
        (world.tick, world.players.len())
    };

    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        tick,
        players,
        clients: state.clients.len(),
        snapshot_bytes: state.snapshot_stats.last_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_world_counts() {
        let state = AppState::new(Config::default());
        let (tx, _rx) = mpsc::channel(1);
        state.clients.connect("a", tx);
        state.snapshot_stats.record(321);

        let response = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["players"], 1);
        assert_eq!(json["clients"], 1);
        assert_eq!(json["snapshotBytes"], 321);
        assert_eq!(json["tick"], 0);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let state = AppState::new(Config::default());
        let response = build_router(state)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
