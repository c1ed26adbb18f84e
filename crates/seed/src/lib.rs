//! Demo data for a fresh revenue dashboard database.

pub mod fixtures;
pub mod seeder;

pub use seeder::{run, SeedOptions, SeedSummary};
