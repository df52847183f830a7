//! Inbound WebSocket message DTOs.

use serde::Deserialize;

/// Identity payload as sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image: String,
}

/// `{ "name": "hp" }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResourceDto {
    pub name: String,
}

/// `{ "base_stat": 45, "stat": { "name": "hp" } }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseStatDto {
    pub base_stat: i32,
    pub stat: NamedResourceDto,
}

/// Combatant payload in the PokeAPI `pokemon` shape (extra fields ignored).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CombatantDto {
    pub name: String,
    #[serde(default)]
    pub stats: Vec<BaseStatDto>,
}

/// Messages a client may send over `/ws`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Authenticate {
        #[serde(default)]
        user: Option<IdentityDto>,
    },
    CreateRoom {
        user: IdentityDto,
    },
    JoinRoom {
        room_id: String,
        user: IdentityDto,
    },
    PlayerReady {
        user: IdentityDto,
    },
    PokemonChosen {
        user: IdentityDto,
        pokemon: CombatantDto,
    },
    Exit {
        user_id: String,
    },
}
