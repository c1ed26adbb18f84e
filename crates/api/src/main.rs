use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revdash_api::background::{metrics_retention, webhook_sweeper, BackgroundTasks};
use revdash_api::config::ServerConfig;
use revdash_api::router::build_app_router;
use revdash_api::state::AppState;
use revdash_api::ws::{self, WsManager};
use revdash_db::DbPool;
use revdash_events::EventBus;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Configuration loaded");

    let pool = connect_database(&config).await;

    let event_bus = Arc::new(EventBus::default());
    let ws_manager = Arc::new(WsManager::new());
    let bridge = tokio::spawn(ws::bridge::run(Arc::clone(&ws_manager), event_bus.subscribe()));
    let background = spawn_background_tasks(&config, &pool, &event_bus, &ws_manager);

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Revenue dashboard API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    shutdown(grace, background, event_bus, bridge, ws_manager, pool).await;
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revdash_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn connect_database(config: &ServerConfig) -> DbPool {
    let pool = revdash_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    revdash_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    revdash_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!(max_connections = config.db_max_connections, "Database ready");
    pool
}

/// Heartbeat always runs. The sweeper and retention jobs are skipped when
/// their interval is zero.
fn spawn_background_tasks(
    config: &ServerConfig,
    pool: &DbPool,
    event_bus: &Arc<EventBus>,
    ws_manager: &Arc<WsManager>,
) -> BackgroundTasks {
    let mut tasks = BackgroundTasks::new();

    let manager = Arc::clone(ws_manager);
    tasks.spawn("websocket heartbeat", move |cancel| ws::heartbeat::run(manager, cancel));

    if config.webhook_sweep_interval_secs > 0 {
        let (pool, bus) = (pool.clone(), Arc::clone(event_bus));
        let interval_secs = config.webhook_sweep_interval_secs;
        tasks.spawn("webhook sweeper", move |cancel| {
            webhook_sweeper::run(pool, bus, interval_secs, cancel)
        });
    }

    if config.realtime_metrics_retention_hours > 0 {
        let pool = pool.clone();
        let hours = config.realtime_metrics_retention_hours;
        tasks.spawn("metrics retention", move |cancel| {
            metrics_retention::run(pool, hours, cancel)
        });
    }

    tracing::info!(tasks = tasks.len(), "Background tasks started");
    tasks
}

/// Stop jobs, then close the event stream (ending the bridge), then the
/// sockets, then the pool.
async fn shutdown(
    grace: Duration,
    background: BackgroundTasks,
    event_bus: Arc<EventBus>,
    bridge: JoinHandle<()>,
    ws_manager: Arc<WsManager>,
    pool: DbPool,
) {
    tracing::info!(grace_secs = grace.as_secs(), "Shutting down");

    background.shutdown(grace).await;

    drop(event_bus);
    if tokio::time::timeout(grace, bridge).await.is_err() {
        tracing::warn!("WebSocket bridge did not stop in time");
    }

    ws_manager.shutdown_all().await;
    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("SIGINT received"),
        () = terminate => tracing::info!("SIGTERM received"),
    }
}
