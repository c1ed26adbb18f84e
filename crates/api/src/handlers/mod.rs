//! Request handlers for the `/api/v1` query and mutation endpoints.
//!
//! Webhook receivers live in [`crate::webhooks`].

pub mod affiliate_metrics;
pub mod alerts;
pub mod amazon_tracking;
pub mod api_usage;
pub mod dashboard;
pub mod memberships;
pub mod realtime;
pub mod transactions;
pub mod webhook_events;
pub mod workflows;
