//! Two-player matchmaking and real-time combat server.
//!
//! Participants authenticate over WebSocket, pair up in rooms of two, pick a
//! combatant each, and watch an autonomous timer-driven battle play out.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
