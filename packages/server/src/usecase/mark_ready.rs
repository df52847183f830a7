//! UseCase: 参加者の準備完了
//!
//! この呼び出しで参加者が Ready に進み、かつ Room の全員が Ready になったときだけ
//! Room の参加者に `allReady` を送る。

use std::sync::Arc;

use crate::domain::{GameEvent, IdentityId, ReadyOutcome, RoomRepository};

use super::{error::MarkReadyError, gateway::BroadcastGateway};

pub struct MarkReadyUseCase {
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
}

impl MarkReadyUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, gateway: Arc<BroadcastGateway>) -> Self {
        Self { rooms, gateway }
    }

    pub async fn execute(&self, identity_id: &IdentityId) -> Result<ReadyOutcome, MarkReadyError> {
        let outcome = self.rooms.mark_ready(identity_id).await?;
        tracing::debug!("'{}' is ready in room {}", identity_id, outcome.room_id);

        if outcome.all_ready {
            tracing::info!("All participants ready in room {}", outcome.room_id);
            self.gateway
                .to_members(
                    &outcome.members,
                    &GameEvent::AllReady {
                        room_id: outcome.room_id.clone(),
                    },
                )
                .await;
        }
        Ok(outcome)
    }
}
