//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kumite_shared::time::{now_jst_millis, to_jst_date};

use crate::{
    domain::Room,
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto, ServiceInfoDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Service name and today's date (JST)
pub async fn service_info() -> Json<ServiceInfoDto> {
    Json(ServiceInfoDto {
        name: env!("CARGO_PKG_NAME").to_string(),
        date: to_jst_date(now_jst_millis()),
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint dumping every room as stored (for testing purposes)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<Room>> {
    Json(state.get_rooms_usecase.execute().await)
}

/// Get one room as stored, with combatants and live stats
pub async fn raw_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(room) => Ok(Json(room)),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::RepositoryError) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::RepositoryError) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
