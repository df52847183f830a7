//! UseCase: Room への参加
//!
//! 参加できるのは、存在していて参加者が 1 人だけの Room に、まだどこにも
//! 着席していない Identity が入る場合のみ。参加者以外の全接続には `joinedRoom`、
//! Room の参加者には `roomJoined(roomId, identity)` を送る。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, GameEvent, Identity, IdentityView, Participant, Room, RoomId, RoomRepository,
};

use super::{error::JoinRoomError, gateway::BroadcastGateway};

pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
}

impl JoinRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, gateway: Arc<BroadcastGateway>) -> Self {
        Self { rooms, gateway }
    }

    /// 参加後の Room を返す
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        joiner: Identity,
    ) -> Result<Room, JoinRoomError> {
        let room = self
            .rooms
            .join_room(&room_id, Participant::seat(&joiner))
            .await?;
        tracing::info!("'{}' joined room {}", joiner.id, room.id);

        self.gateway
            .to_all_except(connection_id, &GameEvent::JoinedRoom)
            .await;
        self.gateway
            .to_members(
                &room.member_ids(),
                &GameEvent::RoomJoined {
                    room_id: room.id.clone(),
                    identity: IdentityView::from(&joiner),
                },
            )
            .await;
        Ok(room)
    }
}
