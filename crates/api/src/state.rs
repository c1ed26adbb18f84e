use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: revdash_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (dashboard clients).
    pub ws_manager: Arc<WsManager>,
    /// In-process bus that handlers publish domain events to.
    pub event_bus: Arc<revdash_events::EventBus>,
}
