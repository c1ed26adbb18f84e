use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::background::run_every;
use crate::ws::manager::WsManager;

pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

/// Ping every dashboard socket once per [`HEARTBEAT_PERIOD`] so idle
/// proxies keep the connection open. Dead sockets are dropped by
/// [`WsManager::ping_all`].
pub async fn run(ws_manager: Arc<WsManager>, cancel: CancellationToken) {
    run_every("websocket heartbeat", HEARTBEAT_PERIOD, cancel, || {
        let ws_manager = Arc::clone(&ws_manager);
        async move {
            if ws_manager.connection_count().await > 0 {
                ws_manager.ping_all().await;
            }
        }
    })
    .await;
}
