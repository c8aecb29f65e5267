//! HTTP/WebSocket API for the game server.
//!
//! The wire surface is deliberately small: a health check for
//! monitoring and a single WebSocket endpoint over which clients
//! create rooms, join them, and play. Room state lives behind per-room
//! actors; handlers only route messages to them.

pub mod websocket;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
};
use seotda::room::RoomManager;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;

/// Application state shared across handlers and WebSocket connections.
/// Cloned per request; cheap due to the Arc wrappers.
#[derive(Clone)]
pub struct AppState {
    pub room_manager: Arc<RoomManager>,
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connection count, mirrored into a gauge.
    pub open_connections: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(room_manager: Arc<RoomManager>, config: Arc<ServerConfig>) -> Self {
        Self {
            room_manager,
            config,
            open_connections: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Create the API router.
///
/// ```text
/// GET /health   - Server health status (public)
/// GET /ws       - WebSocket endpoint for room play
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(websocket::websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let room_count = state.room_manager.room_count().await;

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": room_count,
    }))
}
