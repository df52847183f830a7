//! InMemory Identity Repository 実装
//!
//! Identity Registry の実体。`HashMap<IdentityId, Identity>` を 1 つの Mutex で守る。
//! Identity は切断されても削除しない（stale のまま残る）。
//! 1 つの接続を持てる Identity は常に 1 つだけ。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Identity, IdentityId, IdentityRepository, Registration};

/// インメモリ Identity Repository 実装
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: Mutex<HashMap<IdentityId, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn authenticate(
        &self,
        identity: Identity,
        connection_id: ConnectionId,
    ) -> Registration {
        let mut identities = self.identities.lock().await;

        // 別の Identity で認証し直した接続は、前の持ち主から外す
        identities
            .values_mut()
            .filter(|other| other.id != identity.id)
            .for_each(|other| {
                other.detach_connection(&connection_id);
            });

        if let Some(known) = identities.get_mut(&identity.id) {
            return if known.attach_connection(connection_id) {
                Registration::Attached
            } else {
                Registration::AlreadyAttached
            };
        }

        let mut identity = identity;
        identity.attach_connection(connection_id);
        identities.insert(identity.id.clone(), identity);
        Registration::Registered
    }

    async fn find_by_connection(&self, connection_id: &ConnectionId) -> Option<Identity> {
        let identities = self.identities.lock().await;
        identities
            .values()
            .find(|identity| identity.has_connection(connection_id))
            .cloned()
    }

    async fn forget_connection(
        &self,
        identity_id: &IdentityId,
        connection_id: &ConnectionId,
    ) -> bool {
        let mut identities = self.identities.lock().await;
        identities
            .get_mut(identity_id)
            .is_some_and(|identity| identity.detach_connection(connection_id))
    }

    async fn connections_of(&self, identity_ids: &[IdentityId]) -> Vec<ConnectionId> {
        let identities = self.identities.lock().await;
        identity_ids
            .iter()
            .filter_map(|id| identities.get(id))
            .flat_map(|identity| identity.connection_ids.iter().cloned())
            .collect()
    }

    async fn count(&self) -> usize {
        self.identities.lock().await.len()
    }

    async fn clear(&self) {
        self.identities.lock().await.clear();
    }
}
