//! UseCase: サーバー停止時の後片付け
//!
//! 走っている戦闘をすべて止めてから、Registry と Directory を空にする。

use std::sync::Arc;

use crate::domain::{IdentityRepository, RoomRepository};

use super::combat::CombatScheduler;

pub struct ShutdownUseCase {
    identities: Arc<dyn IdentityRepository>,
    rooms: Arc<dyn RoomRepository>,
    scheduler: Arc<CombatScheduler>,
}

impl ShutdownUseCase {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        rooms: Arc<dyn RoomRepository>,
        scheduler: Arc<CombatScheduler>,
    ) -> Self {
        Self {
            identities,
            rooms,
            scheduler,
        }
    }

    pub async fn execute(&self) {
        let battles = self.scheduler.active_battles().await;
        self.scheduler.shutdown().await;
        let rooms = self.rooms.count_rooms().await;
        self.rooms.clear().await;
        self.identities.clear().await;
        tracing::info!(
            "Shutdown complete: {} battle(s) cancelled, {} room(s) cleared",
            battles,
            rooms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::domain::{
        Combatant, ConnectionId, Identity, IdentityId, Participant, SelectionOutcome, Timestamp,
    };
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryIdentityRepository, InMemoryRoomRepository},
    };
    use crate::usecase::gateway::BroadcastGateway;

    fn identity(id: &str) -> Identity {
        Identity::new(
            IdentityId::new(id.to_string()).unwrap(),
            id.to_string(),
            String::new(),
            String::new(),
        )
    }

    fn combatant() -> Combatant {
        Combatant::new(
            "ditto".to_string(),
            ["hp", "attack", "defense", "special-attack", "special-defense", "speed"]
                .into_iter()
                .map(|name| (name.to_string(), 48))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[tokio::test]
    async fn test_shutdown_cancels_battles_and_clears_stores() {
        // テスト項目: 停止時に戦闘が止まり、Room と Identity がすべて消える
        // given (前提条件):
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let gateway = Arc::new(BroadcastGateway::new(
            identities.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        ));
        let scheduler = Arc::new(CombatScheduler::new(rooms.clone(), gateway));

        identities
            .authenticate(identity("ash"), ConnectionId::generate())
            .await;
        let room_id = rooms
            .create_room(Participant::seat(&identity("ash")), Timestamp::new(0))
            .await
            .unwrap();
        rooms
            .join_room(&room_id, Participant::seat(&identity("gary")))
            .await
            .unwrap();
        let ash = IdentityId::new("ash".to_string()).unwrap();
        let gary = IdentityId::new("gary".to_string()).unwrap();
        rooms.choose_combatant(&ash, combatant()).await.unwrap();
        let SelectionOutcome::CombatReady(plan) =
            rooms.choose_combatant(&gary, combatant()).await.unwrap()
        else {
            panic!("combat should be ready");
        };
        scheduler.start(plan).await;
        let usecase = ShutdownUseCase::new(identities.clone(), rooms.clone(), scheduler.clone());

        // when (操作):
        usecase.execute().await;

        // then (期待する結果):
        assert_eq!(scheduler.active_battles().await, 0);
        assert_eq!(rooms.count_rooms().await, 0);
        assert_eq!(identities.count().await, 0);
    }
}
