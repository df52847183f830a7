//! エンティティ
//!
//! - `Identity`: 自己申告された参加者と、その参加者に紐づく接続 ID の集合
//! - `Participant`: Room 内での参加者（準備状態・選択した Combatant・戦闘中のステータス）
//! - `Room`: 最大 2 人の参加者を保持するセッション
//!
//! Room の状態遷移はすべてここで行い、Repository はロックを取って委譲するだけにする。

use std::{
    collections::{BTreeMap, HashSet},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use super::{
    combat::{StatBlock, cadence_for, damage_between},
    error::{CombatError, RoomError},
    value_object::{ConnectionId, IdentityId, RoomId, Timestamp},
};

/// Room の定員
pub const ROOM_CAPACITY: usize = 2;

/// 参加者が選択した Combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub name: String,
    /// ステータス名（`hp`, `special-attack` など）→ 基礎値
    pub base_stats: BTreeMap<String, i32>,
}

impl Combatant {
    pub fn new(name: String, base_stats: BTreeMap<String, i32>) -> Self {
        Self { name, base_stats }
    }

    pub fn base_stat(&self, name: &str) -> Option<i32> {
        self.base_stats.get(name).copied()
    }
}

/// 登録済みの参加者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub email: String,
    pub image: String,
    /// 同じ Identity で開かれている接続（複数タブなど）
    #[serde(skip)]
    pub connection_ids: HashSet<ConnectionId>,
}

impl Identity {
    pub fn new(id: IdentityId, name: String, email: String, image: String) -> Self {
        Self {
            id,
            name,
            email,
            image,
            connection_ids: HashSet::new(),
        }
    }

    /// 接続を紐づける。既に紐づいていれば `false`
    pub fn attach_connection(&mut self, connection_id: ConnectionId) -> bool {
        self.connection_ids.insert(connection_id)
    }

    /// 接続の紐づけを外す。紐づいていなければ `false`
    pub fn detach_connection(&mut self, connection_id: &ConnectionId) -> bool {
        self.connection_ids.remove(connection_id)
    }

    pub fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        self.connection_ids.contains(connection_id)
    }

    /// 生きている接続が 1 つもない
    pub fn is_stale(&self) -> bool {
        self.connection_ids.is_empty()
    }
}

/// Room 内での参加者の状態（この順にしか進まない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipantStatus {
    Connected,
    Ready,
    Chosen,
}

/// Room に着席している参加者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: IdentityId,
    pub name: String,
    pub email: String,
    pub image: String,
    pub status: ParticipantStatus,
    pub combatant: Option<Combatant>,
    pub live_stats: Option<StatBlock>,
}

impl Participant {
    /// Identity を Room に着席させた直後の状態を作る
    pub fn seat(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            image: identity.image.clone(),
            status: ParticipantStatus::Connected,
            combatant: None,
            live_stats: None,
        }
    }

    fn reset_for_next_round(&mut self) {
        self.status = ParticipantStatus::Connected;
        self.combatant = None;
        self.live_stats = None;
    }
}

/// 戦闘の片側（攻撃する参加者とその攻撃間隔）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatSide {
    pub participant: IdentityId,
    pub cadence_ms: u64,
}

impl CombatSide {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

/// 戦闘中の Room が持つ状態
///
/// ステータス自体は各 `Participant::live_stats` に保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub sides: [CombatSide; 2],
}

/// 戦闘開始時に Scheduler へ渡す計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatPlan {
    pub room_id: RoomId,
    pub sides: [CombatSide; 2],
}

/// `markReady` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyOutcome {
    pub room_id: RoomId,
    pub members: Vec<IdentityId>,
    /// この呼び出しで全員が Ready に揃った
    pub all_ready: bool,
}

/// `chooseCombatant` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// まだ全員が選択していない
    Waiting { room_id: RoomId },
    /// 全員が選択し、戦闘の準備ができた
    CombatReady(CombatPlan),
    /// 全員が選択したが、ステータスの導出に失敗したため戦闘を開始しない
    CombatAborted { room_id: RoomId, reason: CombatError },
}

/// 1 回の攻撃の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub room_id: RoomId,
    pub attacker: IdentityId,
    pub defender: IdentityId,
    pub damage: i32,
    /// 攻撃適用後の両者のステータス
    pub stats: BTreeMap<IdentityId, StatBlock>,
    /// 防御側の hp が 0 以下になった場合の勝者（= 攻撃側）
    pub winner: Option<IdentityId>,
}

/// Room から参加者が抜けた結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    /// 退出前の参加者（通知先の決定に使う）
    pub members_before: Vec<IdentityId>,
    /// Room が削除された
    pub dropped: bool,
    /// 戦闘中だった
    pub interrupted_combat: bool,
}

/// 最大 2 人の参加者を保持するセッション
///
/// 参加者が 0 人の Room は存在してはならない。最後の参加者が抜けたら
/// Repository が同じロック内で削除する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    pub combat: Option<CombatState>,
    pub created_at: Timestamp,
}

impl Room {
    /// 作成者 1 人が着席した Room を作る
    pub fn new(id: RoomId, creator: Participant, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: vec![creator],
            combat: None,
            created_at,
        }
    }

    pub fn contains(&self, identity_id: &IdentityId) -> bool {
        self.participants.iter().any(|p| &p.id == identity_id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= ROOM_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }

    pub fn member_ids(&self) -> Vec<IdentityId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn participant(&self, identity_id: &IdentityId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == identity_id)
    }

    fn participant_mut(&mut self, identity_id: &IdentityId) -> Result<&mut Participant, RoomError> {
        self.participants
            .iter_mut()
            .find(|p| &p.id == identity_id)
            .ok_or_else(|| RoomError::NotSeated(identity_id.to_string()))
    }

    /// 2 人目の参加者を着席させる
    pub fn join(&mut self, participant: Participant) -> Result<(), RoomError> {
        if self.contains(&participant.id) {
            return Err(RoomError::AlreadySeated(participant.id.to_string()));
        }
        if self.is_full() {
            return Err(RoomError::RoomFull);
        }
        self.participants.push(participant);
        Ok(())
    }

    /// 参加者を外す。戦闘中であれば戦闘状態も破棄する
    ///
    /// 外した参加者がいなければ `false`
    pub fn remove_participant(&mut self, identity_id: &IdentityId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| &p.id != identity_id);
        let removed = self.participants.len() != before;
        if removed && self.combat.take().is_some() {
            self.participants
                .iter_mut()
                .for_each(Participant::reset_for_next_round);
        }
        removed
    }

    pub fn all_ready(&self) -> bool {
        !self.is_empty()
            && self
                .participants
                .iter()
                .all(|p| p.status == ParticipantStatus::Ready)
    }

    pub fn all_chosen(&self) -> bool {
        !self.is_empty()
            && self
                .participants
                .iter()
                .all(|p| p.status == ParticipantStatus::Chosen)
    }

    /// 参加者を Ready にする
    ///
    /// `all_ready` はこの呼び出しで Connected → Ready に進み、かつ全員が
    /// Ready になった場合のみ `true`。同じ準備サイクルで 2 度 `true` にはならない。
    pub fn mark_ready(&mut self, identity_id: &IdentityId) -> Result<ReadyOutcome, RoomError> {
        if self.in_combat() {
            return Err(RoomError::CombatInProgress);
        }
        let participant = self.participant_mut(identity_id)?;
        let advanced = participant.status == ParticipantStatus::Connected;
        if advanced {
            participant.status = ParticipantStatus::Ready;
        }
        Ok(ReadyOutcome {
            room_id: self.id.clone(),
            members: self.member_ids(),
            all_ready: advanced && self.all_ready(),
        })
    }

    /// 参加者の Combatant を選択する
    ///
    /// 満席の Room で全員が選択済みになったら、同じ呼び出しの中で戦闘を開始する。
    pub fn choose_combatant(
        &mut self,
        identity_id: &IdentityId,
        combatant: Combatant,
    ) -> Result<SelectionOutcome, RoomError> {
        if self.in_combat() {
            return Err(RoomError::CombatInProgress);
        }
        let participant = self.participant_mut(identity_id)?;
        participant.combatant = Some(combatant);
        participant.status = ParticipantStatus::Chosen;

        if !(self.is_full() && self.all_chosen()) {
            return Ok(SelectionOutcome::Waiting {
                room_id: self.id.clone(),
            });
        }

        Ok(match self.begin_combat() {
            Ok(plan) => SelectionOutcome::CombatReady(plan),
            Err(reason) => SelectionOutcome::CombatAborted {
                room_id: self.id.clone(),
                reason,
            },
        })
    }

    /// 両者のステータスを導出して戦闘状態に入る
    ///
    /// どちらか一方でも導出に失敗した場合、Room は一切変更されない。
    fn begin_combat(&mut self) -> Result<CombatPlan, CombatError> {
        if self.participants.len() != ROOM_CAPACITY {
            return Err(CombatError::NotEnoughParticipants(self.participants.len()));
        }

        let mut derived = Vec::with_capacity(ROOM_CAPACITY);
        for participant in &self.participants {
            let combatant = participant
                .combatant
                .as_ref()
                .ok_or_else(|| CombatError::NoCombatant(participant.id.to_string()))?;
            let stats = StatBlock::derive(combatant)?;
            let cadence = cadence_for(stats.speed).ok_or_else(|| CombatError::InvalidSpeed {
                combatant: combatant.name.clone(),
                speed: stats.speed,
            })?;
            derived.push((stats, cadence));
        }

        let sides: Vec<CombatSide> = self
            .participants
            .iter_mut()
            .zip(derived)
            .map(|(participant, (stats, cadence))| {
                participant.live_stats = Some(stats);
                CombatSide {
                    participant: participant.id.clone(),
                    cadence_ms: cadence.as_millis() as u64,
                }
            })
            .collect();
        let sides: [CombatSide; 2] = sides
            .try_into()
            .map_err(|v: Vec<CombatSide>| CombatError::NotEnoughParticipants(v.len()))?;

        self.combat = Some(CombatState {
            sides: sides.clone(),
        });
        Ok(CombatPlan {
            room_id: self.id.clone(),
            sides,
        })
    }

    /// `attacker` の攻撃を 1 回適用する
    ///
    /// 防御側の hp が 0 以下になったら戦闘を終了し、参加者を次の準備サイクル
    /// （Connected）に戻す。
    pub fn apply_attack(&mut self, attacker: &IdentityId) -> Result<AttackOutcome, RoomError> {
        if !self.in_combat() {
            return Err(RoomError::NoActiveCombat);
        }
        let attacker_stats = self
            .participant(attacker)
            .and_then(|p| p.live_stats)
            .ok_or_else(|| RoomError::NotSeated(attacker.to_string()))?;
        let defender = self
            .participants
            .iter_mut()
            .find(|p| &p.id != attacker)
            .ok_or(RoomError::NoActiveCombat)?;
        let defender_stats = defender.live_stats.as_mut().ok_or(RoomError::NoActiveCombat)?;

        let damage = damage_between(&attacker_stats, defender_stats);
        defender_stats.hp = defender_stats.hp.saturating_sub(damage);
        let defeated = defender_stats.is_defeated();
        let defender_id = defender.id.clone();

        let stats = self
            .participants
            .iter()
            .filter_map(|p| p.live_stats.map(|s| (p.id.clone(), s)))
            .collect();

        let winner = if defeated {
            self.combat = None;
            self.participants
                .iter_mut()
                .for_each(Participant::reset_for_next_round);
            Some(attacker.clone())
        } else {
            None
        };

        Ok(AttackOutcome {
            room_id: self.id.clone(),
            attacker: attacker.clone(),
            defender: defender_id,
            damage,
            stats,
            winner,
        })
    }
}
