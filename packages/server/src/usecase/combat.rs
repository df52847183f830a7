//! 戦闘スケジューラ
//!
//! 戦闘中の Room ごとに、参加者 1 人につき 1 本の攻撃ループ（tokio タスク）を走らせる。
//! 各ループは自分の攻撃間隔で `RoomRepository::apply_attack` を呼び、
//! 結果を `attack` / `victory` として Room の参加者に配信する。
//!
//! ## 不変条件
//!
//! - 1 つの Room で同時に走る戦闘は高々 1 つ
//! - `victory` の後、または `cancel` の後には `attack` も `victory` も配信しない
//! - 同時刻に両者の hp が 0 になる場合でも `victory` は 1 回だけ
//!
//! 「攻撃の適用 → 配信」は戦闘ごとの `tick_guard` の内側で行い、
//! その中でキャンセル済みかどうかを確認する。`cancel` も同じ guard を取ってから
//! トークンを落とすので、キャンセル完了後に配信されるイベントはない。

use std::{collections::HashMap, sync::Arc};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{CombatPlan, CombatSide, GameEvent, RoomId, RoomRepository};

use super::gateway::BroadcastGateway;

struct Battle {
    id: Uuid,
    token: CancellationToken,
    tick_guard: Arc<Mutex<()>>,
    tasks: Vec<JoinHandle<()>>,
}

type BattleMap = Arc<Mutex<HashMap<RoomId, Battle>>>;

/// 戦闘中の Room と攻撃ループを管理する
pub struct CombatScheduler {
    repository: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
    battles: BattleMap,
}

impl CombatScheduler {
    pub fn new(repository: Arc<dyn RoomRepository>, gateway: Arc<BroadcastGateway>) -> Self {
        Self {
            repository,
            gateway,
            battles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 戦闘を開始する
    ///
    /// 同じ Room の戦闘がすでに走っていれば何もしない（`false`）。
    /// 終了済み（トークンがキャンセル済み）の戦闘が残っていれば置き換える。
    pub async fn start(&self, plan: CombatPlan) -> bool {
        let mut battles = self.battles.lock().await;
        if let Some(existing) = battles.get(&plan.room_id) {
            if !existing.token.is_cancelled() {
                tracing::warn!("Combat already running in room {}", plan.room_id);
                return false;
            }
            // 終了済みのループは自分で抜けるので abort しない（victory の配信中かもしれない）
            tracing::debug!("Replacing finished combat in room {}", plan.room_id);
            battles.remove(&plan.room_id);
        }

        let battle_id = Uuid::new_v4();
        let started_at = Instant::now();
        let token = CancellationToken::new();
        let tick_guard = Arc::new(Mutex::new(()));
        let tasks = plan
            .sides
            .iter()
            .map(|side| {
                let attack_loop = AttackLoop {
                    battle_id,
                    started_at,
                    room_id: plan.room_id.clone(),
                    side: side.clone(),
                    token: token.clone(),
                    tick_guard: Arc::clone(&tick_guard),
                    repository: Arc::clone(&self.repository),
                    gateway: Arc::clone(&self.gateway),
                    battles: Arc::clone(&self.battles),
                };
                tokio::spawn(attack_loop.run())
            })
            .collect();

        tracing::info!(
            "Combat started in room {} ({}ms vs {}ms)",
            plan.room_id,
            plan.sides[0].cadence_ms,
            plan.sides[1].cadence_ms
        );
        battles.insert(
            plan.room_id,
            Battle {
                id: battle_id,
                token,
                tick_guard,
                tasks,
            },
        );
        true
    }

    /// 戦闘を止める。戻ったあとにこの Room の戦闘イベントは配信されない。
    ///
    /// 走っていなければ何もしない（`false`）。
    pub async fn cancel(&self, room_id: &RoomId) -> bool {
        let Some(battle) = self.battles.lock().await.remove(room_id) else {
            return false;
        };

        // 配信中の tick があれば終わるのを待つ
        let _guard = battle.tick_guard.lock().await;
        battle.token.cancel();
        for task in &battle.tasks {
            task.abort();
        }
        tracing::info!("Combat in room {} cancelled", room_id);
        true
    }

    pub async fn is_running(&self, room_id: &RoomId) -> bool {
        self.battles.lock().await.contains_key(room_id)
    }

    pub async fn active_battles(&self) -> usize {
        self.battles.lock().await.len()
    }

    /// すべての戦闘を止める
    pub async fn shutdown(&self) {
        let room_ids: Vec<RoomId> = self.battles.lock().await.keys().cloned().collect();
        for room_id in room_ids {
            self.cancel(&room_id).await;
        }
    }
}

/// 片側の参加者の攻撃ループ
struct AttackLoop {
    battle_id: Uuid,
    started_at: Instant,
    room_id: RoomId,
    side: CombatSide,
    token: CancellationToken,
    tick_guard: Arc<Mutex<()>>,
    repository: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
    battles: BattleMap,
}

impl AttackLoop {
    async fn run(self) {
        let cadence = self.side.cadence();
        let mut ticker = interval_at(self.started_at + cadence, cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let _guard = self.tick_guard.lock().await;
            if self.token.is_cancelled() {
                break;
            }

            let outcome = match self
                .repository
                .apply_attack(&self.room_id, &self.side.participant)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(
                        "Attack by {} in room {} failed: {}",
                        self.side.participant,
                        self.room_id,
                        e
                    );
                    self.token.cancel();
                    break;
                }
            };

            // Room は apply_attack の中で次の準備サイクルに戻っている。
            // 再戦の start が登録を見て弾かれないよう、配信より先に外す。
            if outcome.winner.is_some() {
                self.token.cancel();
                self.release().await;
            }

            let members: Vec<_> = outcome.stats.keys().cloned().collect();
            tracing::debug!(
                "{} hits {} for {} in room {}",
                outcome.attacker,
                outcome.defender,
                outcome.damage,
                outcome.room_id
            );
            let attack = GameEvent::Attack {
                room_id: outcome.room_id.clone(),
                attacker: outcome.attacker.clone(),
                damage: outcome.damage,
                stats: outcome.stats,
            };
            self.gateway.to_members(&members, &attack).await;

            if let Some(winner) = outcome.winner {
                tracing::info!("{} wins in room {}", winner, outcome.room_id);
                let victory = GameEvent::Victory {
                    room_id: outcome.room_id,
                    winner,
                };
                self.gateway.to_members(&members, &victory).await;
                break;
            }
        }

        self.release().await;
    }

    /// 自分の戦闘がまだ登録されていれば外す
    async fn release(&self) {
        let mut battles = self.battles.lock().await;
        if battles
            .get(&self.room_id)
            .is_some_and(|battle| battle.id == self.battle_id)
        {
            battles.remove(&self.room_id);
        }
    }
}
