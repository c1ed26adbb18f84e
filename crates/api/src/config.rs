use revdash_core::stripe::DEFAULT_SIGNATURE_TOLERANCE_SECS;
use revdash_core::types::DbId;

/// Server configuration loaded from environment variables.
///
/// All fields except `database_url` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Postgres connection string (required).
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining work after the listener stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum accepted request body in bytes (default: 10 MB).
    pub body_limit_bytes: usize,
    /// Maximum pooled database connections (default: `10`).
    pub db_max_connections: u32,
    pub stripe: StripeConfig,
    /// Seconds between webhook sweeps; `0` disables the sweeper.
    pub webhook_sweep_interval_secs: u64,
    /// Age after which real-time metrics are deleted; `0` keeps them forever.
    pub realtime_metrics_retention_hours: i64,
}

/// Stripe webhook settings.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Signing secret. When unset, signatures are not verified.
    pub webhook_secret: Option<String>,
    /// Workflow credited with Stripe payments and events.
    pub workflow_id: DbId,
    /// Allowed clock skew for the signed timestamp.
    pub signature_tolerance_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                            | Default                                       |
    /// |------------------------------------|-----------------------------------------------|
    /// | `DATABASE_URL`                     | required                                      |
    /// | `HOST`                             | `0.0.0.0`                                     |
    /// | `PORT`                             | `3001`                                        |
    /// | `CORS_ORIGINS`                     | `http://localhost:3000,http://127.0.0.1:3000` |
    /// | `REQUEST_TIMEOUT_SECS`             | `30`                                          |
    /// | `SHUTDOWN_TIMEOUT_SECS`            | `30`                                          |
    /// | `BODY_LIMIT_BYTES`                 | `10485760`                                    |
    /// | `DB_MAX_CONNECTIONS`               | `10`                                          |
    /// | `STRIPE_WEBHOOK_SECRET`            | unset                                         |
    /// | `STRIPE_WORKFLOW_ID`               | `1`                                           |
    /// | `STRIPE_SIGNATURE_TOLERANCE_SECS`  | `300`                                         |
    /// | `WEBHOOK_SWEEP_INTERVAL_SECS`      | `0`                                           |
    /// | `REALTIME_METRICS_RETENTION_HOURS` | `0`                                           |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let body_limit_bytes: usize = std::env::var("BODY_LIMIT_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("BODY_LIMIT_BYTES must be a valid usize");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .map(|v| v.parse().expect("DB_MAX_CONNECTIONS must be a valid u32"))
            .unwrap_or(revdash_db::DEFAULT_MAX_CONNECTIONS);

        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let stripe_workflow_id: DbId = std::env::var("STRIPE_WORKFLOW_ID")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("STRIPE_WORKFLOW_ID must be a valid i64");

        let signature_tolerance_secs: i64 = std::env::var("STRIPE_SIGNATURE_TOLERANCE_SECS")
            .map(|v| {
                v.parse()
                    .expect("STRIPE_SIGNATURE_TOLERANCE_SECS must be a valid i64")
            })
            .unwrap_or(DEFAULT_SIGNATURE_TOLERANCE_SECS);

        let webhook_sweep_interval_secs: u64 = std::env::var("WEBHOOK_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("WEBHOOK_SWEEP_INTERVAL_SECS must be a valid u64");

        let realtime_metrics_retention_hours: i64 =
            std::env::var("REALTIME_METRICS_RETENTION_HOURS")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .expect("REALTIME_METRICS_RETENTION_HOURS must be a valid i64");

        Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            body_limit_bytes,
            db_max_connections,
            stripe: StripeConfig {
                webhook_secret,
                workflow_id: stripe_workflow_id,
                signature_tolerance_secs,
            },
            webhook_sweep_interval_secs,
            realtime_metrics_retention_hours,
        }
    }
}
