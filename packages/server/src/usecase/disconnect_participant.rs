//! UseCase: 接続の切断
//!
//! 1. MessagePusher から接続を外す
//! 2. 接続に紐づく Identity があれば、接続を外し、着席中の Room から退出させる
//!    （戦闘中なら攻撃ループを止めて Room ごと片付ける）。残った参加者に
//!    `roomDisconnected` を送る
//! 3. 他の全接続に `userDisconnected` を送る
//!
//! 同じ Identity の別タブが残っていても Room からは外す。Identity 自体は
//! Registry に残る（stale）。

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, GameEvent, IdentityRepository, RoomRepository};

use super::{combat::CombatScheduler, departure::drop_out, gateway::BroadcastGateway};

pub struct DisconnectParticipantUseCase {
    identities: Arc<dyn IdentityRepository>,
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
    scheduler: Arc<CombatScheduler>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        rooms: Arc<dyn RoomRepository>,
        gateway: Arc<BroadcastGateway>,
        scheduler: Arc<CombatScheduler>,
    ) -> Self {
        Self {
            identities,
            rooms,
            gateway,
            scheduler,
        }
    }

    /// 切断を処理し、Room から退出させた場合はその結果を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        self.gateway
            .message_pusher()
            .unregister_client(connection_id)
            .await;

        let departure = match self.identities.find_by_connection(connection_id).await {
            Some(identity) => {
                self.identities
                    .forget_connection(&identity.id, connection_id)
                    .await;
                drop_out(
                    self.rooms.as_ref(),
                    &self.scheduler,
                    &self.gateway,
                    &identity.id,
                )
                .await
            }
            None => None,
        };

        self.gateway
            .to_all_except(connection_id, &GameEvent::UserDisconnected)
            .await;
        tracing::info!("Connection '{}' closed", connection_id);
        departure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, IdentityId, MessagePusher, Participant, RoomId, Timestamp};
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

    struct Fixture {
        usecase: DisconnectParticipantUseCase,
        identities: Arc<InMemoryIdentityRepository>,
        rooms: Arc<InMemoryRoomRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        room_id: RoomId,
        ash_conn: ConnectionId,
        gary_rx: mpsc::UnboundedReceiver<String>,
    }

    /// ash と gary が認証済みで同じ Room に着席している
    async fn fixture() -> Fixture {
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let rooms = Arc::new(InMemoryRoomRepository::new());

        let (ash_tx, _ash_rx) = mpsc::unbounded_channel();
        let (gary_tx, gary_rx) = mpsc::unbounded_channel();
        let ash_conn = ConnectionId::generate();
        let gary_conn = ConnectionId::generate();
        pusher.register_client(ash_conn.clone(), ash_tx).await;
        pusher.register_client(gary_conn.clone(), gary_tx).await;
        identities
            .authenticate(identity("ash"), ash_conn.clone())
            .await;
        identities.authenticate(identity("gary"), gary_conn).await;

        let room_id = rooms
            .create_room(Participant::seat(&identity("ash")), Timestamp::new(0))
            .await
            .unwrap();
        rooms
            .join_room(&room_id, Participant::seat(&identity("gary")))
            .await
            .unwrap();

        let gateway = Arc::new(BroadcastGateway::new(identities.clone(), pusher.clone()));
        let scheduler = Arc::new(CombatScheduler::new(rooms.clone(), gateway.clone()));
        Fixture {
            usecase: DisconnectParticipantUseCase::new(
                identities.clone(),
                rooms.clone(),
                gateway,
                scheduler,
            ),
            identities,
            rooms,
            pusher,
            room_id,
            ash_conn,
            gary_rx,
        }
    }

    #[tokio::test]
    async fn test_disconnect_removes_identity_from_room_and_notifies() {
        // テスト項目: 切断で Room から外れ、残った参加者に roomDisconnected と userDisconnected が届く
        // given (前提条件):
        let mut f = fixture().await;

        // when (操作):
        let departure = f.usecase.execute(&f.ash_conn).await.unwrap();

        // then (期待する結果):
        assert_eq!(departure.room_id, f.room_id);
        let room = f.rooms.get_room(&f.room_id).await.unwrap();
        assert_eq!(room.participants.len(), 1);

        let first: serde_json::Value =
            serde_json::from_str(&f.gary_rx.recv().await.unwrap()).unwrap();
        let second: serde_json::Value =
            serde_json::from_str(&f.gary_rx.recv().await.unwrap()).unwrap();
        assert_eq!(first["type"], "roomDisconnected");
        assert_eq!(first["identity"], "ash");
        assert_eq!(second["type"], "userDisconnected");

        assert_eq!(f.pusher.connected_clients().await.len(), 1);
        let ash = IdentityId::new("ash".to_string()).unwrap();
        assert!(f.identities.connections_of(&[ash]).await.is_empty());
        assert_eq!(f.identities.count().await, 2);
    }

    #[tokio::test]
    async fn test_disconnect_of_unauthenticated_connection() {
        // テスト項目: 認証前の接続の切断は Room に影響せず userDisconnected だけが届く
        // given (前提条件):
        let mut f = fixture().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let anonymous = ConnectionId::generate();
        f.pusher.register_client(anonymous.clone(), tx).await;

        // when (操作):
        let departure = f.usecase.execute(&anonymous).await;

        // then (期待する結果):
        assert!(departure.is_none());
        assert_eq!(f.rooms.count_rooms().await, 1);
        assert_eq!(
            f.gary_rx.recv().await,
            Some(r#"{"type":"userDisconnected"}"#.to_string())
        );
    }
}
