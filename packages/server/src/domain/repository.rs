//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェース。
//! 具体的な実装は Infrastructure 層が提供する（依存性の逆転）。
//!
//! Room の読み書きはすべて 1 回のメソッド呼び出し（= 1 回のロック区間）で完結させる。
//! 「読んでから書く」を UseCase 側で分けて行わないこと。

use async_trait::async_trait;

use super::{
    AttackOutcome, Combatant, ConnectionId, Departure, Identity, IdentityId, Participant,
    ReadyOutcome, RepositoryError, Room, RoomId, SelectionOutcome, Timestamp,
};

/// `authenticate` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// 初めて見る Identity を登録した
    Registered,
    /// 既知の Identity に新しい接続を紐づけた
    Attached,
    /// 既に紐づいている接続だった
    AlreadyAttached,
}

/// Identity Registry
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Identity を登録する、または既存の Identity に接続を紐づける
    async fn authenticate(
        &self,
        identity: Identity,
        connection_id: ConnectionId,
    ) -> Registration;

    /// 接続 ID から Identity を引く
    async fn find_by_connection(&self, connection_id: &ConnectionId) -> Option<Identity>;

    /// 接続の紐づけを外す（Identity 自体は残す）
    async fn forget_connection(
        &self,
        identity_id: &IdentityId,
        connection_id: &ConnectionId,
    ) -> bool;

    /// 指定した Identity 群に紐づく全接続
    async fn connections_of(&self, identity_ids: &[IdentityId]) -> Vec<ConnectionId>;

    /// 登録済み Identity 数
    async fn count(&self) -> usize;

    /// すべて破棄する（シャットダウン時）
    async fn clear(&self);
}

/// Room Directory
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 全 Room（作成順）
    async fn list_rooms(&self) -> Vec<Room>;

    /// ID で Room を取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// Identity が着席している Room
    async fn find_room_containing(&self, identity_id: &IdentityId) -> Option<Room>;

    /// Room を作成し、作成者を着席させる
    ///
    /// 作成者が既にどこかの Room に着席している場合は `AlreadySeated`
    async fn create_room(
        &self,
        creator: Participant,
        created_at: Timestamp,
    ) -> Result<RoomId, RepositoryError>;

    /// 参加者が 1 人の Room に 2 人目として着席する
    async fn join_room(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<Room, RepositoryError>;

    /// 着席中の Room で Ready にする
    async fn mark_ready(&self, identity_id: &IdentityId) -> Result<ReadyOutcome, RepositoryError>;

    /// 着席中の Room で Combatant を選ぶ（全員揃えば同じロック内で戦闘開始）
    async fn choose_combatant(
        &self,
        identity_id: &IdentityId,
        combatant: Combatant,
    ) -> Result<SelectionOutcome, RepositoryError>;

    /// 戦闘中の Room で 1 回分の攻撃を適用する
    async fn apply_attack(
        &self,
        room_id: &RoomId,
        attacker: &IdentityId,
    ) -> Result<AttackOutcome, RepositoryError>;

    /// Identity を着席中の Room から外す
    ///
    /// 空になった Room、または戦闘中だった Room は同じロック内で削除する。
    /// どこにも着席していなければ `None`
    async fn remove_identity(&self, identity_id: &IdentityId) -> Option<Departure>;

    /// Room 数
    async fn count_rooms(&self) -> usize;

    /// すべて破棄する（シャットダウン時）
    async fn clear(&self);
}
