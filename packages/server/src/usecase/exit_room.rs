//! UseCase: Room からの退出
//!
//! 戦闘中なら攻撃ループを止め、Room ごと片付ける（victory は送らない）。
//! 退出前の参加者全員に `userExit(userId)` を送る。

use std::sync::Arc;

use crate::domain::{Departure, GameEvent, IdentityId, RoomRepository};

use super::{
    combat::CombatScheduler, departure::vacate_seat, error::ExitRoomError,
    gateway::BroadcastGateway,
};

pub struct ExitRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
    scheduler: Arc<CombatScheduler>,
}

impl ExitRoomUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        gateway: Arc<BroadcastGateway>,
        scheduler: Arc<CombatScheduler>,
    ) -> Self {
        Self {
            rooms,
            gateway,
            scheduler,
        }
    }

    pub async fn execute(&self, identity_id: &IdentityId) -> Result<Departure, ExitRoomError> {
        let departure = vacate_seat(self.rooms.as_ref(), &self.scheduler, identity_id)
            .await
            .ok_or_else(|| ExitRoomError::NotSeated(identity_id.to_string()))?;
        tracing::info!("'{}' left room {}", identity_id, departure.room_id);

        self.gateway
            .to_members(
                &departure.members_before,
                &GameEvent::UserExit {
                    user_id: identity_id.clone(),
                },
            )
            .await;
        Ok(departure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::Duration;

    use crate::domain::{
        Combatant, ConnectionId, Identity, IdentityRepository, MessagePusher, Participant,
        RoomId, SelectionOutcome, Timestamp,
    };
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryIdentityRepository, InMemoryRoomRepository},
    };
    use tokio::sync::mpsc;

    fn identity(id: &str) -> Identity {
        Identity::new(
            IdentityId::new(id.to_string()).unwrap(),
            id.to_string(),
            String::new(),
            String::new(),
        )
    }

    fn id(value: &str) -> IdentityId {
        IdentityId::new(value.to_string()).unwrap()
    }

    fn sturdy(name: &str) -> Combatant {
        Combatant::new(
            name.to_string(),
            BTreeMap::from([
                ("hp".to_string(), 1000),
                ("attack".to_string(), 10),
                ("defense".to_string(), 10),
                ("special-attack".to_string(), 10),
                ("special-defense".to_string(), 10),
                ("speed".to_string(), 150),
            ]),
        )
    }

    struct Fixture {
        usecase: ExitRoomUseCase,
        rooms: Arc<InMemoryRoomRepository>,
        scheduler: Arc<CombatScheduler>,
        room_id: RoomId,
        gary_rx: mpsc::UnboundedReceiver<String>,
    }

    /// ash と gary が着席した Room。gary の接続を受信箱につなぐ。
    async fn fixture() -> Fixture {
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let (tx, gary_rx) = mpsc::unbounded_channel();
        let conn = ConnectionId::generate();
        pusher.register_client(conn.clone(), tx).await;
        identities.authenticate(identity("gary"), conn).await;

        let room_id = rooms
            .create_room(Participant::seat(&identity("ash")), Timestamp::new(0))
            .await
            .unwrap();
        rooms
            .join_room(&room_id, Participant::seat(&identity("gary")))
            .await
            .unwrap();
        let gateway = Arc::new(BroadcastGateway::new(identities, pusher));
        let scheduler = Arc::new(CombatScheduler::new(rooms.clone(), gateway.clone()));
        Fixture {
            usecase: ExitRoomUseCase::new(rooms.clone(), gateway, scheduler.clone()),
            rooms,
            scheduler,
            room_id,
            gary_rx,
        }
    }

    #[tokio::test]
    async fn test_exit_keeps_room_for_remaining_participant() {
        // テスト項目: 戦闘外の退出では Room は残り、残った参加者に userExit が届く
        // given (前提条件):
        let mut f = fixture().await;

        // when (操作):
        let departure = f.usecase.execute(&id("ash")).await.unwrap();

        // then (期待する結果):
        assert!(!departure.dropped);
        let room = f.rooms.get_room(&f.room_id).await.unwrap();
        assert_eq!(room.member_ids(), vec![id("gary")]);
        let event: serde_json::Value =
            serde_json::from_str(&f.gary_rx.recv().await.unwrap()).unwrap();
        assert_eq!(event["type"], "userExit");
        assert_eq!(event["userId"], "ash");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_during_combat_tears_room_down_without_victory() {
        // テスト項目: 戦闘中の退出で攻撃ループが止まり、Room が消え、victory は届かない
        // given (前提条件):
        let mut f = fixture().await;
        f.rooms.choose_combatant(&id("ash"), sturdy("a")).await.unwrap();
        let plan = match f.rooms.choose_combatant(&id("gary"), sturdy("g")).await.unwrap() {
            SelectionOutcome::CombatReady(plan) => plan,
            other => panic!("combat should be ready: {other:?}"),
        };
        f.scheduler.start(plan).await;

        // when (操作):
        let departure = f.usecase.execute(&id("ash")).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        // then (期待する結果):
        assert!(departure.interrupted_combat);
        assert!(departure.dropped);
        assert!(f.rooms.get_room(&f.room_id).await.is_err());
        assert!(!f.scheduler.is_running(&f.room_id).await);
        let event: serde_json::Value =
            serde_json::from_str(&f.gary_rx.recv().await.unwrap()).unwrap();
        assert_eq!(event["type"], "userExit");
        assert!(f.gary_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_exit_when_not_seated_is_rejected() {
        // テスト項目: どの Room にもいない Identity の退出は NotSeated
        // given (前提条件):
        let f = fixture().await;

        // when (操作):
        let result = f.usecase.execute(&id("brock")).await;

        // then (期待する結果):
        assert_eq!(result, Err(ExitRoomError::NotSeated("brock".to_string())));
    }
}
