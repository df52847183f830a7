//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{ParticipantStatus, StatBlock};

/// `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfoDto {
    pub name: String,
    pub date: String,
}

/// One entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participants: Vec<String>,
    pub in_combat: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: ParticipantStatus,
    pub combatant: Option<String>,
    pub stats: Option<StatBlock>,
}

/// `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub in_combat: bool,
    pub created_at: String,
}
