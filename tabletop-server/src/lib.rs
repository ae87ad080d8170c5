//! Tabletop Server - HTTP/WebSocket adapter for the game registry
//!
//! This crate provides the web backend:
//! - REST API mapping onto registry operations
//! - Per-room WebSocket event streams
//! - Static file serving for a browser client

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tabletop_core::RegistryConfig;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use error::ApiError;
pub use state::{RoomEvent, RoomEventKind, RoomEvents, ServerState};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    pub registry: RegistryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            static_dir: "public".to_string(),
            registry: RegistryConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<String>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Lobby
        .route(
            "/api/games",
            get(routes::games::list_games).post(routes::games::create_game),
        )
        // Room API
        .route("/api/game/:id", get(routes::games::get_game))
        .route("/api/game/:id/join", post(routes::games::join_game))
        .route("/api/game/:id/leave", post(routes::games::leave_game))
        .route("/api/game/:id/move", post(routes::moves::make_move))
        .route("/api/game/:id/roll", post(routes::moves::roll_dice))
        .route("/api/game/:id/ludo-move", post(routes::moves::move_ludo_piece))
        // Room event stream
        .route("/api/game/:id/events", get(routes::events::subscribe))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::with_config(config.registry.clone()));
    let router = create_router(&config, state);

    tracing::info!("Tabletop server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
