//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Most take `&PgPool`; methods the webhook receivers call inside a
//! database transaction accept any `PgExecutor` instead.

pub mod affiliate_metric_repo;
pub mod alert_repo;
pub mod amazon_tracking_repo;
pub mod api_usage_repo;
pub mod dashboard_repo;
pub mod membership_repo;
pub mod realtime_metric_repo;
pub mod transaction_repo;
pub mod webhook_event_repo;
pub mod workflow_config_repo;
pub mod workflow_repo;

pub use affiliate_metric_repo::AffiliateMetricRepo;
pub use alert_repo::AlertRepo;
pub use amazon_tracking_repo::AmazonTrackingRepo;
pub use api_usage_repo::ApiUsageRepo;
pub use dashboard_repo::DashboardRepo;
pub use membership_repo::MembershipRepo;
pub use realtime_metric_repo::RealTimeMetricRepo;
pub use transaction_repo::TransactionRepo;
pub use webhook_event_repo::WebhookEventRepo;
pub use workflow_config_repo::WorkflowConfigRepo;
pub use workflow_repo::WorkflowRepo;
