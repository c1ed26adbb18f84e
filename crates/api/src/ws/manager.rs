//! Registry of connected dashboard sockets and what each one follows.

use std::collections::{BTreeSet, HashMap};

use axum::body::Bytes;
use axum::extract::ws::Message;
use revdash_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Outbound queue of one socket. The socket task drains the receiver.
pub type ClientSender = mpsc::UnboundedSender<Message>;
pub type ClientReceiver = mpsc::UnboundedReceiver<Message>;

struct Client {
    sender: ClientSender,
    connected_at: Timestamp,
    /// Followed workflows. Empty follows everything, including events
    /// that belong to no workflow.
    workflows: BTreeSet<DbId>,
}

impl Client {
    fn follows(&self, workflow_id: Option<DbId>) -> bool {
        match workflow_id {
            _ if self.workflows.is_empty() => true,
            Some(id) => self.workflows.contains(&id),
            None => false,
        }
    }
}

/// Shared by the upgrade handler, the event bridge and the heartbeat.
#[derive(Default)]
pub struct WsManager {
    clients: RwLock<HashMap<String, Client>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a socket and hand back the queue its writer task should drain.
    pub async fn register(&self, conn_id: String) -> ClientReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        let client = Client {
            sender,
            connected_at: chrono::Utc::now(),
            workflows: BTreeSet::new(),
        };
        self.clients.write().await.insert(conn_id, client);
        receiver
    }

    pub async fn unregister(&self, conn_id: &str) {
        if let Some(client) = self.clients.write().await.remove(conn_id) {
            let open_secs = (chrono::Utc::now() - client.connected_at).num_seconds();
            tracing::debug!(conn_id, open_secs, "WebSocket client unregistered");
        }
    }

    /// Returns `false` when `conn_id` is not registered.
    pub async fn subscribe(&self, conn_id: &str, workflow_id: DbId) -> bool {
        self.with_client(conn_id, |c| {
            c.workflows.insert(workflow_id);
        })
        .await
    }

    /// Returns `false` when `conn_id` is not registered.
    pub async fn unsubscribe(&self, conn_id: &str, workflow_id: DbId) -> bool {
        self.with_client(conn_id, |c| {
            c.workflows.remove(&workflow_id);
        })
        .await
    }

    async fn with_client(&self, conn_id: &str, f: impl FnOnce(&mut Client)) -> bool {
        let mut clients = self.clients.write().await;
        clients.get_mut(conn_id).map(f).is_some()
    }

    /// Followed workflow ids in ascending order.
    pub async fn subscriptions(&self, conn_id: &str) -> Vec<DbId> {
        self.clients
            .read()
            .await
            .get(conn_id)
            .map(|c| c.workflows.iter().copied().collect())
            .unwrap_or_default()
    }

    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.clients
            .read()
            .await
            .get(conn_id)
            .is_some_and(|c| c.sender.send(message).is_ok())
    }

    /// Queue `message` for every client following `workflow_id` and drop
    /// clients whose socket task has gone away.
    ///
    /// Returns how many clients received it.
    pub async fn publish(&self, workflow_id: Option<DbId>, message: Message) -> usize {
        let mut delivered = 0;
        self.clients.write().await.retain(|_, client| {
            if !client.follows(workflow_id) {
                return !client.sender.is_closed();
            }
            let sent = client.sender.send(message.clone()).is_ok();
            delivered += usize::from(sent);
            sent
        });
        delivered
    }

    /// Ping every client, dropping dead ones. Returns the live count.
    pub async fn ping_all(&self) -> usize {
        let mut clients = self.clients.write().await;
        clients.retain(|_, c| c.sender.send(Message::Ping(Bytes::new())).is_ok());
        clients.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Queue a Close frame for every client and forget them all.
    pub async fn shutdown_all(&self) {
        let clients: Vec<Client> = self.clients.write().await.drain().map(|(_, c)| c).collect();
        for client in &clients {
            let _ = client.sender.send(Message::Close(None));
        }
        tracing::info!(count = clients.len(), "Closed all WebSocket connections");
    }
}
