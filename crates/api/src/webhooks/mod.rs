//! Inbound webhook receivers, mounted at `/api/v1/webhooks`.
//!
//! Runner and generic receivers answer with their own acknowledgement
//! bodies rather than the `{ "data": ... }` envelope, since the senders
//! are automation tools, not the dashboard.

pub mod generic;
pub mod pending;
pub mod runner;
pub mod stripe;
