use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::protocol::{ClientMessage, InitData, ServerMessage, CONNECTED_MESSAGE};

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and
/// managed by two tasks (sender + receiver).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager` and greets the client.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound messages on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.register(conn_id.clone()).await;

    let now = chrono::Utc::now();
    ws_manager
        .send_to(
            &conn_id,
            ServerMessage::Connection {
                message: CONNECTED_MESSAGE,
                timestamp: now,
            }
            .to_message(),
        )
        .await;
    ws_manager
        .send_to(
            &conn_id,
            ServerMessage::Init {
                data: InitData {
                    connected: true,
                    server_time: now,
                },
            }
            .to_message(),
        )
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_client_message(&ws_manager, &conn_id, text.as_str()).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.unregister(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Dispatch one JSON text frame from a client.
pub(crate) async fn handle_client_message(ws_manager: &WsManager, conn_id: &str, text: &str) {
    let reply = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => ServerMessage::Pong {
            timestamp: chrono::Utc::now(),
        },
        Ok(ClientMessage::Subscribe { workflow_id }) => {
            ws_manager.subscribe(conn_id, workflow_id).await;
            tracing::debug!(conn_id = %conn_id, workflow_id, "Client subscribed to workflow");
            ServerMessage::Subscribed { workflow_id }
        }
        Ok(ClientMessage::Unsubscribe { workflow_id }) => {
            ws_manager.unsubscribe(conn_id, workflow_id).await;
            tracing::debug!(conn_id = %conn_id, workflow_id, "Client unsubscribed from workflow");
            ServerMessage::Unsubscribed { workflow_id }
        }
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unrecognised WebSocket message");
            ServerMessage::Error {
                message: format!("Invalid message: {e}"),
            }
        }
    };
    ws_manager.send_to(conn_id, reply.to_message()).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn next_json(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Message>) -> serde_json::Value {
        match rx.recv().await {
            Some(Message::Text(text)) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let manager = WsManager::new();
        let mut rx = manager.register("c1".into()).await;

        handle_client_message(&manager, "c1", r#"{"type":"ping"}"#).await;

        let reply = next_json(&mut rx).await;
        assert_eq!(reply["type"], "pong");
        assert!(reply["timestamp"].is_string());
    }

    #[tokio::test]
    async fn subscribe_and_unsubscribe_update_the_filter() {
        let manager = WsManager::new();
        let mut rx = manager.register("c1".into()).await;

        handle_client_message(&manager, "c1", r#"{"type":"subscribe","workflowId":4}"#).await;
        assert_eq!(next_json(&mut rx).await["type"], "subscribed");
        assert_eq!(manager.subscriptions("c1").await, vec![4]);

        handle_client_message(&manager, "c1", r#"{"type":"unsubscribe","workflowId":4}"#).await;
        assert_eq!(next_json(&mut rx).await["workflowId"], 4);
        assert!(manager.subscriptions("c1").await.is_empty());
    }

    #[tokio::test]
    async fn garbage_gets_an_error_reply() {
        let manager = WsManager::new();
        let mut rx = manager.register("c1".into()).await;

        handle_client_message(&manager, "c1", "not json").await;

        assert_eq!(next_json(&mut rx).await["type"], "error");
    }
}
