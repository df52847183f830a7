//! UseCase: Identity の認証（接続と Identity の紐づけ）
//!
//! - 未知の Identity: 登録し、他の全接続へ `userConnected`
//! - 既知の Identity の新しい接続: 接続集合に追加するだけ（通知なし）
//! - 同じ接続での再認証: 何もしない
//! - 別の Identity で認証済みの接続: 前の Identity から接続を外し、
//!   着席していれば切断と同じく Room から退出させる

use std::sync::Arc;

use crate::domain::{
    ConnectionId, GameEvent, Identity, IdentityRepository, IdentityView, Registration,
    RoomRepository,
};

use super::{
    combat::CombatScheduler, departure::drop_out, error::AuthenticateError,
    gateway::BroadcastGateway,
};

pub struct AuthenticateUseCase {
    identities: Arc<dyn IdentityRepository>,
    rooms: Arc<dyn RoomRepository>,
    gateway: Arc<BroadcastGateway>,
    scheduler: Arc<CombatScheduler>,
}

impl AuthenticateUseCase {
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

    /// # Returns
    ///
    /// * `Ok(Registration)` - 登録結果
    /// * `Err(AuthenticateError::MissingIdentity)` - ペイロードに Identity がない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        identity: Option<Identity>,
    ) -> Result<Registration, AuthenticateError> {
        let identity = identity.ok_or(AuthenticateError::MissingIdentity)?;
        let view = IdentityView::from(&identity);
        let previous = self
            .identities
            .find_by_connection(connection_id)
            .await
            .filter(|owner| owner.id != identity.id);

        let registration = self
            .identities
            .authenticate(identity, connection_id.clone())
            .await;
        tracing::info!(
            "Identity '{}' authenticated on '{}': {:?}",
            view.id,
            connection_id,
            registration
        );

        if let Some(previous) = previous {
            tracing::info!(
                "Connection '{}' switched from '{}' to '{}'",
                connection_id,
                previous.id,
                view.id
            );
            drop_out(
                self.rooms.as_ref(),
                &self.scheduler,
                &self.gateway,
                &previous.id,
            )
            .await;
        }

        if registration == Registration::Registered {
            self.gateway
                .to_all_except(connection_id, &GameEvent::UserConnected { identity: view })
                .await;
        }
        Ok(registration)
    }
}
