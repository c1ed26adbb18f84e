//! Fans event-bus events out to WebSocket clients.

use std::sync::Arc;

use revdash_events::PlatformEvent;
use tokio::sync::broadcast;

use crate::ws::manager::WsManager;
use crate::ws::protocol::ServerMessage;

/// Forward every bus event to the connections whose filter admits it.
///
/// The loop exits when the channel is closed (i.e. the
/// [`EventBus`](revdash_events::EventBus) is dropped).
pub async fn run(ws_manager: Arc<WsManager>, mut receiver: broadcast::Receiver<PlatformEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                let workflow_id = event.workflow_id;
                let event_type = event.event_type.clone();
                let message = ServerMessage::Event { event }.to_message();
                let delivered = ws_manager.publish(workflow_id, message).await;
                tracing::trace!(event_type = %event_type, delivered, "Event pushed to WebSocket clients");
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "WebSocket bridge lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("Event bus closed, WebSocket bridge shutting down");
                break;
            }
        }
    }
}
