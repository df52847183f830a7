//! UI layer: axum routes, WebSocket sessions, and server wiring.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
