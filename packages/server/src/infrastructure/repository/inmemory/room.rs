//! InMemory Room Repository 実装
//!
//! Room Directory の実体。作成順の `Vec<Room>` を 1 つの Mutex で守り、
//! 各メソッドは 1 回のロック区間の中で読み書きを完結させる。
//! これにより Room ごとの状態（参加者・ステータス・戦闘状態）への同時書き込みは起きない。
//!
//! ## 技術的負債
//!
//! Directory 全体で 1 つのロックを使っているため、Room 数が増えると競合する。
//! Room ごとの Mutex に分割するのは Room 数が問題になってから。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    AttackOutcome, Combatant, Departure, IdentityId, Participant, ReadyOutcome, RepositoryError,
    Room, RoomError, RoomId, RoomIdFactory, RoomRepository, SelectionOutcome, Timestamp,
};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<Vec<Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn seated_in<'a>(rooms: &'a mut [Room], identity_id: &IdentityId) -> Option<&'a mut Room> {
    rooms.iter_mut().find(|room| room.contains(identity_id))
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn list_rooms(&self) -> Vec<Room> {
        self.rooms.lock().await.clone()
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .iter()
            .find(|room| &room.id == room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))
    }

    async fn find_room_containing(&self, identity_id: &IdentityId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.iter().find(|room| room.contains(identity_id)).cloned()
    }

    async fn create_room(
        &self,
        creator: Participant,
        created_at: Timestamp,
    ) -> Result<RoomId, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.iter().any(|room| room.contains(&creator.id)) {
            return Err(RoomError::AlreadySeated(creator.id.to_string()).into());
        }

        let room_id = RoomIdFactory::generate();
        rooms.push(Room::new(room_id.clone(), creator, created_at));
        Ok(room_id)
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.iter().any(|room| room.contains(&participant.id)) {
            return Err(RoomError::AlreadySeated(participant.id.to_string()).into());
        }

        let room = rooms
            .iter_mut()
            .find(|room| &room.id == room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        room.join(participant)?;
        Ok(room.clone())
    }

    async fn mark_ready(&self, identity_id: &IdentityId) -> Result<ReadyOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = seated_in(&mut rooms, identity_id)
            .ok_or_else(|| RepositoryError::NotSeated(identity_id.to_string()))?;
        Ok(room.mark_ready(identity_id)?)
    }

    async fn choose_combatant(
        &self,
        identity_id: &IdentityId,
        combatant: Combatant,
    ) -> Result<SelectionOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = seated_in(&mut rooms, identity_id)
            .ok_or_else(|| RepositoryError::NotSeated(identity_id.to_string()))?;
        Ok(room.choose_combatant(identity_id, combatant)?)
    }

    async fn apply_attack(
        &self,
        room_id: &RoomId,
        attacker: &IdentityId,
    ) -> Result<AttackOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .iter_mut()
            .find(|room| &room.id == room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        Ok(room.apply_attack(attacker)?)
    }

    async fn remove_identity(&self, identity_id: &IdentityId) -> Option<Departure> {
        let mut rooms = self.rooms.lock().await;
        let index = rooms.iter().position(|room| room.contains(identity_id))?;

        let room = &mut rooms[index];
        let members_before = room.member_ids();
        let interrupted_combat = room.in_combat();
        room.remove_participant(identity_id);

        let dropped = room.is_empty() || interrupted_combat;
        let room_id = room.id.clone();
        if dropped {
            rooms.remove(index);
            tracing::info!("Room {} dropped", room_id);
        } else {
            tracing::info!("Identity {} removed from room {}", identity_id, room_id);
        }

        Some(Departure {
            room_id,
            members_before,
            dropped,
            interrupted_combat,
        })
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }

    async fn clear(&self) {
        self.rooms.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, ParticipantStatus, ROOM_CAPACITY};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - Room の作成・参加・退出と、空になった Room の即時削除
    // - 1 つの Identity が同時に 2 つの Room に着席しないこと
    // - 満席 / 存在しない Room への参加が拒否されること
    // - 戦闘中の退出で Room ごと破棄されること
    // ========================================

    fn seat(id: &str) -> Participant {
        Participant::seat(&Identity::new(
            IdentityId::new(id.to_string()).unwrap(),
            id.to_string(),
            String::new(),
            String::new(),
        ))
    }

    fn id(value: &str) -> IdentityId {
        IdentityId::new(value.to_string()).unwrap()
    }

    fn combatant(speed: i32) -> Combatant {
        Combatant::new(
            "eevee".to_string(),
            [
                ("hp", 55),
                ("attack", 55),
                ("defense", 50),
                ("special-attack", 45),
                ("special-defense", 65),
                ("speed", speed),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }

    async fn repo_with_full_room() -> (InMemoryRoomRepository, RoomId) {
        let repo = InMemoryRoomRepository::new();
        let room_id = repo.create_room(seat("ash"), Timestamp::new(0)).await.unwrap();
        repo.join_room(&room_id, seat("gary")).await.unwrap();
        (repo, room_id)
    }

    #[tokio::test]
    async fn test_create_room_seats_creator() {
        // テスト項目: 作成者が Connected で着席した Room が作られる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let room_id = repo
            .create_room(seat("ash"), Timestamp::new(1000))
            .await
            .unwrap();

        // then (期待する結果):
        let room = repo.get_room(&room_id).await.unwrap();
        assert_eq!(room.member_ids(), vec![id("ash")]);
        assert_eq!(room.participants[0].status, ParticipantStatus::Connected);
        assert_eq!(room.created_at, Timestamp::new(1000));
    }

    #[tokio::test]
    async fn test_create_room_refuses_already_seated_identity() {
        // テスト項目: 既に着席している Identity は新しい Room を作れない
        // given (前提条件):
        let (repo, _room_id) = repo_with_full_room().await;

        // when (操作):
        let result = repo.create_room(seat("ash"), Timestamp::new(0)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::Room(RoomError::AlreadySeated("ash".to_string())))
        );
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_join_full_room_is_rejected() {
        // テスト項目: 満席の Room に 3 人目は参加できない
        // given (前提条件):
        let (repo, room_id) = repo_with_full_room().await;

        // when (操作):
        let result = repo.join_room(&room_id, seat("brock")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::Room(RoomError::RoomFull)));
        let room = repo.get_room(&room_id).await.unwrap();
        assert_eq!(room.participants.len(), ROOM_CAPACITY);
        assert!(repo.find_room_containing(&id("brock")).await.is_none());
    }

    #[tokio::test]
    async fn test_join_missing_room_is_rejected() {
        // テスト項目: 存在しない Room への参加はエラーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let missing = RoomIdFactory::generate();

        // when (操作):
        let result = repo.join_room(&missing, seat("ash")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_identity_cannot_join_second_room() {
        // テスト項目: ある Room に着席中の Identity は別の Room に参加できない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let first = repo.create_room(seat("ash"), Timestamp::new(0)).await.unwrap();
        let second = repo.create_room(seat("gary"), Timestamp::new(0)).await.unwrap();

        // when (操作):
        let result = repo.join_room(&second, seat("ash")).await;

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(repo.find_room_containing(&id("ash")).await.unwrap().id, first);
        assert_eq!(repo.get_room(&second).await.unwrap().participants.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_last_participant_drops_room() {
        // テスト項目: 最後の参加者が抜けた Room は直後の参照で存在しない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_id = repo.create_room(seat("ash"), Timestamp::new(0)).await.unwrap();

        // when (操作):
        let departure = repo.remove_identity(&id("ash")).await.unwrap();

        // then (期待する結果):
        assert_eq!(departure.room_id, room_id);
        assert!(departure.dropped);
        assert!(!departure.interrupted_combat);
        assert!(matches!(
            repo.get_room(&room_id).await,
            Err(RepositoryError::RoomNotFound(_))
        ));
        assert_eq!(repo.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_remove_one_of_two_keeps_room() {
        // テスト項目: 2 人のうち 1 人が抜けても Room は残る
        // given (前提条件):
        let (repo, room_id) = repo_with_full_room().await;

        // when (操作):
        let departure = repo.remove_identity(&id("gary")).await.unwrap();

        // then (期待する結果):
        assert!(!departure.dropped);
        assert_eq!(departure.members_before, vec![id("ash"), id("gary")]);
        let room = repo.get_room(&room_id).await.unwrap();
        assert_eq!(room.member_ids(), vec![id("ash")]);
    }

    #[tokio::test]
    async fn test_remove_unseated_identity_returns_none() {
        // テスト項目: どこにも着席していない Identity の退出は None
        // given (前提条件):
        let (repo, _room_id) = repo_with_full_room().await;

        // when (操作):
        let departure = repo.remove_identity(&id("misty")).await;

        // then (期待する結果):
        assert!(departure.is_none());
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_remove_during_combat_tears_room_down() {
        // テスト項目: 戦闘中に退出すると Room ごと破棄される
        // given (前提条件):
        let (repo, room_id) = repo_with_full_room().await;
        repo.choose_combatant(&id("ash"), combatant(55)).await.unwrap();
        let outcome = repo.choose_combatant(&id("gary"), combatant(90)).await.unwrap();
        assert!(matches!(outcome, SelectionOutcome::CombatReady(_)));

        // when (操作):
        let departure = repo.remove_identity(&id("ash")).await.unwrap();

        // then (期待する結果):
        assert!(departure.interrupted_combat);
        assert!(departure.dropped);
        assert!(repo.find_room_containing(&id("gary")).await.is_none());
        assert!(matches!(
            repo.apply_attack(&room_id, &id("gary")).await,
            Err(RepositoryError::RoomNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_ready_requires_seat() {
        // テスト項目: 着席していない Identity の Ready はエラーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo.mark_ready(&id("ash")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::NotSeated("ash".to_string())));
    }

    #[tokio::test]
    async fn test_mark_ready_reports_all_ready() {
        // テスト項目: 2 人目が Ready になった時点で all_ready が報告される
        // given (前提条件):
        let (repo, room_id) = repo_with_full_room().await;

        // when (操作):
        let first = repo.mark_ready(&id("ash")).await.unwrap();
        let second = repo.mark_ready(&id("gary")).await.unwrap();

        // then (期待する結果):
        assert!(!first.all_ready);
        assert!(second.all_ready);
        assert_eq!(second.room_id, room_id);
    }

    #[tokio::test]
    async fn test_apply_attack_updates_stored_room() {
        // テスト項目: 攻撃の結果が保存されている Room に反映される
        // given (前提条件):
        let (repo, room_id) = repo_with_full_room().await;
        repo.choose_combatant(&id("ash"), combatant(55)).await.unwrap();
        repo.choose_combatant(&id("gary"), combatant(90)).await.unwrap();

        // when (操作):
        let outcome = repo.apply_attack(&room_id, &id("ash")).await.unwrap();

        // then (期待する結果):
        // physical 55-50=5, special 45-65=-20 -> 5
        assert_eq!(outcome.damage, 5);
        let room = repo.get_room(&room_id).await.unwrap();
        let gary = room.participant(&id("gary")).unwrap();
        assert_eq!(gary.live_stats.unwrap().hp, 50);
    }

    #[tokio::test]
    async fn test_list_rooms_keeps_creation_order() {
        // テスト項目: Room 一覧は作成順に並ぶ
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let first = repo.create_room(seat("ash"), Timestamp::new(0)).await.unwrap();
        let second = repo.create_room(seat("gary"), Timestamp::new(0)).await.unwrap();

        // when (操作):
        let rooms = repo.list_rooms().await;

        // then (期待する結果):
        let ids: Vec<RoomId> = rooms.into_iter().map(|room| room.id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
