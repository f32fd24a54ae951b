//! WebSocket channel for live catalog synchronization.
//!
//! Provides connection management, heartbeat pings, the message protocol and
//! the HTTP upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;
pub mod protocol;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
