//! Events pushed from the server to connected clients.
//!
//! Serialized as JSON objects tagged by `"type"`, e.g.
//! `{"type":"victory","roomId":"…","winner":"ash"}`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    combat::StatBlock,
    value_object::{IdentityId, RoomId},
};

/// Public view of an identity (connection ids are never sent out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityView {
    pub id: IdentityId,
    pub name: String,
    pub email: String,
    pub image: String,
}

impl From<&super::entity::Identity> for IdentityView {
    fn from(identity: &super::entity::Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            image: identity.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    /// A new identity registered (everyone but the authenticating connection).
    UserConnected { identity: IdentityView },
    /// Some room became available (everyone but the creator). Carries no id.
    RoomCreated,
    /// Acknowledgment to the creating connection.
    RoomCreatedSelf { room_id: RoomId },
    /// Someone joined some room (everyone but the joiner).
    JoinedRoom,
    /// The room is now full (room members).
    RoomJoined { room_id: RoomId, identity: IdentityView },
    AllReady { room_id: RoomId },
    AllChosen { room_id: RoomId },
    /// One damage tick with both sides' stats after the hit.
    Attack {
        room_id: RoomId,
        attacker: IdentityId,
        damage: i32,
        stats: BTreeMap<IdentityId, StatBlock>,
    },
    Victory { room_id: RoomId, winner: IdentityId },
    UserDisconnected,
    /// A room member lost its connection (remaining members).
    RoomDisconnected { room_id: RoomId, identity: IdentityId },
    UserExit { user_id: IdentityId },
}

impl GameEvent {
    /// Event name as it appears in the `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserConnected { .. } => "userConnected",
            Self::RoomCreated => "roomCreated",
            Self::RoomCreatedSelf { .. } => "roomCreatedSelf",
            Self::JoinedRoom => "joinedRoom",
            Self::RoomJoined { .. } => "roomJoined",
            Self::AllReady { .. } => "allReady",
            Self::AllChosen { .. } => "allChosen",
            Self::Attack { .. } => "attack",
            Self::Victory { .. } => "victory",
            Self::UserDisconnected => "userDisconnected",
            Self::RoomDisconnected { .. } => "roomDisconnected",
            Self::UserExit { .. } => "userExit",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
