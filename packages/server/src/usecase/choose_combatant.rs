//! UseCase: Combatant の選択
//!
//! 満席の Room で全員が選択を終えると、Repository が同じロック区間の中で
//! 戦闘状態に入る。その後 Room の参加者に `allChosen` を送り、
//! `CombatScheduler` に攻撃ループを開始させる。

use std::sync::Arc;

use crate::domain::{Combatant, GameEvent, IdentityId, RoomRepository, SelectionOutcome};

use super::{combat::CombatScheduler, error::ChooseCombatantError, gateway::BroadcastGateway};

pub struct ChooseCombatantUseCase {
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
    scheduler: Arc<CombatScheduler>,
}

impl ChooseCombatantUseCase {
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

    /// # Returns
    ///
    /// * `Ok(SelectionOutcome::Waiting)` - 相手の選択待ち
    /// * `Ok(SelectionOutcome::CombatReady)` - 戦闘を開始した
    /// * `Err(ChooseCombatantError::CombatAborted)` - ステータスが欠けていて開始できない
    pub async fn execute(
        &self,
        identity_id: &IdentityId,
        combatant: Combatant,
    ) -> Result<SelectionOutcome, ChooseCombatantError> {
        let combatant_name = combatant.name.clone();
        let outcome = self.rooms.choose_combatant(identity_id, combatant).await?;
        tracing::debug!("'{}' chose '{}'", identity_id, combatant_name);

        match &outcome {
            SelectionOutcome::Waiting { .. } => {}
            SelectionOutcome::CombatReady(plan) => {
                let members: Vec<IdentityId> = plan
                    .sides
                    .iter()
                    .map(|side| side.participant.clone())
                    .collect();
                self.gateway
                    .to_members(
                        &members,
                        &GameEvent::AllChosen {
                            room_id: plan.room_id.clone(),
                        },
                    )
                    .await;
                if !self.scheduler.start(plan.clone()).await {
                    tracing::error!("Room {} armed but its combat did not start", plan.room_id);
                }
            }
            SelectionOutcome::CombatAborted { room_id, reason } => {
                tracing::warn!("Combat in room {} not started: {}", room_id, reason);
                return Err(ChooseCombatantError::CombatAborted(reason.clone()));
            }
        }
        Ok(outcome)
    }
}
