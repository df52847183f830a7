//! UseCase: Room の作成
//!
//! 作成者は `Connected` で着席する。作成した接続には `roomCreatedSelf(roomId)`、
//! それ以外の全接続には ID なしの `roomCreated` を送る。

use std::sync::Arc;

use kumite_shared::time::now_jst_millis;

use crate::domain::{
    ConnectionId, GameEvent, Identity, Participant, RoomId, RoomRepository, Timestamp,
};

use super::{error::CreateRoomError, gateway::BroadcastGateway};

pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
}

impl CreateRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, gateway: Arc<BroadcastGateway>) -> Self {
        Self { rooms, gateway }
    }

    /// # Returns
    ///
    /// * `Ok(RoomId)` - 作成した Room の ID
    /// * `Err(CreateRoomError::AlreadySeated)` - すでにどこかの Room に着席している
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        creator: Identity,
    ) -> Result<RoomId, CreateRoomError> {
        let room_id = self
            .rooms
            .create_room(
                Participant::seat(&creator),
                Timestamp::new(now_jst_millis()),
            )
            .await?;
        tracing::info!("Room {} created by '{}'", room_id, creator.id);

        self.gateway
            .to_connection(
                connection_id,
                &GameEvent::RoomCreatedSelf {
                    room_id: room_id.clone(),
                },
            )
            .await;
        self.gateway
            .to_all_except(connection_id, &GameEvent::RoomCreated)
            .await;
        Ok(room_id)
    }
}
