//! WebSocket infrastructure for real-time dashboard updates.
//!
//! Provides connection management with per-connection workflow filters,
//! the JSON message protocol, heartbeat pings, the event-bus bridge, and
//! the HTTP upgrade handler used by Axum routes.

pub mod bridge;
mod handler;
pub mod heartbeat;
pub mod manager;
pub mod protocol;

pub use handler::ws_handler;
pub use manager::WsManager;
