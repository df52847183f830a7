//! メッセージ送信（通知）の抽象化
//!
//! UseCase 層はこの trait にのみ依存し、WebSocket などの具体的な送信手段は
//! Infrastructure 層が提供する（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ConnectionId};

/// 接続 1 本へメッセージを届けるチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録する
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除する
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 本の接続へ送信する
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続へ送信する（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 登録中のすべての接続
    async fn connected_clients(&self) -> Vec<ConnectionId>;
}
