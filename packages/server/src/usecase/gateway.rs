//! イベント配信の窓口
//!
//! `GameEvent` を JSON にして、宛先（接続 1 本 / 自分以外の全員 / Room の参加者）
//! ごとに `MessagePusher` へ渡す。配信の失敗は呼び出し元に返さずログに残す。

use std::sync::Arc;

use crate::domain::{ConnectionId, GameEvent, IdentityId, IdentityRepository, MessagePusher};

pub struct BroadcastGateway {
    identities: Arc<dyn IdentityRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastGateway {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            identities,
            message_pusher,
        }
    }

    pub fn message_pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.message_pusher
    }

    /// 1 本の接続へ送る
    pub async fn to_connection(&self, connection_id: &ConnectionId, event: &GameEvent) {
        let Some(json) = encode(event) else {
            return;
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &json).await {
            tracing::warn!(
                "Failed to push '{}' to connection '{}': {}",
                event.name(),
                connection_id,
                e
            );
        }
    }

    /// 指定した接続以外のすべての接続へ送る
    pub async fn to_all_except(&self, excluded: &ConnectionId, event: &GameEvent) {
        let targets = self
            .message_pusher
            .connected_clients()
            .await
            .into_iter()
            .filter(|id| id != excluded)
            .collect();
        self.send(targets, event).await;
    }

    /// Identity に紐づくすべての接続へ送る
    ///
    /// 接続を持たない（stale な）Identity は黙って飛ばす。
    pub async fn to_members(&self, members: &[IdentityId], event: &GameEvent) {
        let targets = self.identities.connections_of(members).await;
        self.send(targets, event).await;
    }

    async fn send(&self, targets: Vec<ConnectionId>, event: &GameEvent) {
        if targets.is_empty() {
            tracing::debug!("No recipients for '{}'", event.name());
            return;
        }
        let Some(json) = encode(event) else {
            return;
        };
        if let Err(e) = self.message_pusher.broadcast(targets, &json).await {
            tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
        }
    }
}

fn encode(event: &GameEvent) -> Option<String> {
    match event.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize '{}': {}", event.name(), e);
            None
        }
    }
}
