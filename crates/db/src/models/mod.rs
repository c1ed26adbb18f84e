//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Update DTOs or aggregate rows where the dashboard needs them

pub mod affiliate_metric;
pub mod alert;
pub mod amazon_tracking;
pub mod api_usage;
pub mod dashboard;
pub mod membership;
pub mod realtime_metric;
pub mod transaction;
pub mod webhook_event;
pub mod workflow;
pub mod workflow_config;
