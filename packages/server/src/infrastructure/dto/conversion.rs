//! Conversion logic between DTOs and domain entities.

use kumite_shared::time::to_jst_rfc3339;

use crate::domain::{Combatant, Identity, IdentityId, Participant, Room, ValueObjectError};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::IdentityDto> for Identity {
    type Error = ValueObjectError;

    fn try_from(dto: dto::IdentityDto) -> Result<Self, Self::Error> {
        Ok(Identity::new(
            IdentityId::new(dto.id)?,
            dto.name,
            dto.email,
            dto.image,
        ))
    }
}

impl From<dto::CombatantDto> for Combatant {
    fn from(dto: dto::CombatantDto) -> Self {
        Combatant::new(
            dto.name,
            dto.stats
                .into_iter()
                .map(|entry| (entry.stat.name, entry.base_stat))
                .collect(),
        )
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.id.as_str().to_string())
                .collect(),
            in_combat: room.in_combat(),
            created_at: to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Participant> for http::ParticipantDetailDto {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.as_str().to_string(),
            name: participant.name.clone(),
            image: participant.image.clone(),
            status: participant.status,
            combatant: participant.combatant.as_ref().map(|c| c.name.clone()),
            stats: participant.live_stats,
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room.participants.iter().map(Into::into).collect(),
            in_combat: room.in_combat(),
            created_at: to_jst_rfc3339(room.created_at.value()),
        }
    }
}
