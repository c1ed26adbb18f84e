//! Domain vocabulary and pure business rules for the revenue dashboard.
//!
//! This crate has no I/O. It holds the status/tier/severity vocabularies,
//! their validators, and the small computations (rates, rolling workflow
//! statistics, revenue summaries, webhook status mapping, Stripe signature
//! checks) shared by the database, API, and seed crates.

pub mod affiliate;
pub mod alert;
pub mod error;
pub mod membership;
pub mod metrics;
pub mod pagination;
pub mod stripe;
pub mod transaction;
pub mod types;
pub mod webhook;
pub mod workflow;
