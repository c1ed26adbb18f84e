//! Dot-separated event type names published on the bus.

pub const WEBHOOK_RECEIVED: &str = "webhook.received";
pub const WEBHOOKS_PROCESSED: &str = "webhooks.processed";
pub const WORKFLOW_CREATED: &str = "workflow.created";
pub const WORKFLOW_UPDATED: &str = "workflow.updated";
pub const WORKFLOW_DELETED: &str = "workflow.deleted";
pub const WORKFLOW_STATUS_CHANGED: &str = "workflow.status_changed";
pub const TRANSACTION_CREATED: &str = "transaction.created";
pub const TRANSACTION_STATUS_CHANGED: &str = "transaction.status_changed";
pub const METRIC_RECORDED: &str = "metric.recorded";
pub const ALERT_CREATED: &str = "alert.created";
pub const ALERT_UPDATED: &str = "alert.updated";
pub const MEMBERSHIP_UPDATED: &str = "membership.updated";
