//! JSON messages exchanged with dashboard clients.

use axum::extract::ws::Message;
use revdash_core::types::{DbId, Timestamp};
use revdash_events::PlatformEvent;
use serde::{Deserialize, Serialize};

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Ping,
    Subscribe { workflow_id: DbId },
    Unsubscribe { workflow_id: DbId },
}

/// Messages the server sends.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Connection {
        message: &'static str,
        timestamp: Timestamp,
    },
    Init {
        data: InitData,
    },
    Pong {
        timestamp: Timestamp,
    },
    #[serde(rename_all = "camelCase")]
    Subscribed {
        workflow_id: DbId,
    },
    #[serde(rename_all = "camelCase")]
    Unsubscribed {
        workflow_id: DbId,
    },
    Event {
        event: PlatformEvent,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitData {
    pub connected: bool,
    pub server_time: Timestamp,
}

pub const CONNECTED_MESSAGE: &str = "Connected to real-time updates";

impl ServerMessage {
    /// Encode as a text frame. Serialization of these types cannot fail.
    pub fn to_message(&self) -> Message {
        let text = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        Message::Text(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_client_messages() {
        let ping: ClientMessage = serde_json::from_value(json!({"type": "ping"})).unwrap();
        assert_eq!(ping, ClientMessage::Ping);

        let sub: ClientMessage =
            serde_json::from_value(json!({"type": "subscribe", "workflowId": 3})).unwrap();
        assert_eq!(sub, ClientMessage::Subscribe { workflow_id: 3 });
    }

    #[test]
    fn subscribe_without_workflow_is_rejected() {
        let result = serde_json::from_value::<ClientMessage>(json!({"type": "subscribe"}));
        assert!(result.is_err());
    }

    #[test]
    fn server_messages_are_tagged() {
        let now = chrono::Utc::now();
        let init = serde_json::to_value(ServerMessage::Init {
            data: InitData {
                connected: true,
                server_time: now,
            },
        })
        .unwrap();
        assert_eq!(init["type"], "init");
        assert_eq!(init["data"]["connected"], true);
        assert!(init["data"]["serverTime"].is_string());

        let sub = serde_json::to_value(ServerMessage::Subscribed { workflow_id: 7 }).unwrap();
        assert_eq!(sub, json!({"type": "subscribed", "workflowId": 7}));
    }
}
