//! Request handlers.

mod http;
mod websocket;

pub use http::{
    debug_rooms, get_room_detail, get_rooms, health_check, raw_room_detail, service_info,
};
pub use websocket::websocket_handler;
