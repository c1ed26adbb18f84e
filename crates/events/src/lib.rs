//! In-process event bus for live dashboard updates.
//!
//! Nothing here is persisted. Events exist only for the subscribers that
//! are listening when they are published.

pub mod bus;
pub mod event;
pub mod kinds;

pub use bus::EventBus;
pub use event::PlatformEvent;
