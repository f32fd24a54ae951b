//! Catalog event bus.
//!
//! Every successful catalog mutation publishes one [`CatalogEvent`] carrying
//! the full post-change catalog. Subscribers (the WebSocket broadcaster in
//! the API crate) fan it out to connected clients.

pub mod bus;

pub use bus::{CatalogEvent, EventBus};
