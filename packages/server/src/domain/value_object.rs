//! 値オブジェクト
//!
//! ID 類はすべて不変の文字列ラッパー。空文字列は受け付けない。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// 参加者（Identity）の ID
///
/// クライアントが自己申告する ID。検証はしない（認証は対象外）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::IdentityIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for IdentityId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// WebSocket 接続 1 本ごとの ID（サーバー側で採番）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しい接続 ID を採番する（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room の ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// UUID v4 から RoomId を生成する
    pub fn generate() -> RoomId {
        RoomId(Uuid::new_v4().to_string())
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_rejects_blank() {
        // テスト項目: 空白のみの IdentityId は作成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = IdentityId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::IdentityIdEmpty));
    }

    #[test]
    fn test_identity_id_keeps_value() {
        // テスト項目: IdentityId は与えられた文字列をそのまま保持する
        // given (前提条件):
        let value = "ash".to_string();

        // when (操作):
        let id = IdentityId::try_from(value).unwrap();

        // then (期待する結果):
        assert_eq!(id.as_str(), "ash");
        assert_eq!(id.to_string(), "ash");
    }

    #[test]
    fn test_room_id_factory_generates_unique_ids() {
        // テスト項目: RoomIdFactory は毎回異なる ID を生成する
        // given (前提条件):

        // when (操作):
        let first = RoomIdFactory::generate();
        let second = RoomIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn test_connection_id_generate_is_not_empty() {
        // テスト項目: 採番された ConnectionId は空でない
        // given (前提条件):

        // when (操作):
        let id = ConnectionId::generate();

        // then (期待する結果):
        assert!(!id.as_str().is_empty());
        assert_ne!(id, ConnectionId::generate());
    }

    #[test]
    fn test_identity_id_serializes_transparently() {
        // テスト項目: IdentityId は JSON 上ただの文字列として表現される
        // given (前提条件):
        let id = IdentityId::new("misty".to_string()).unwrap();

        // when (操作):
        let json = serde_json::to_string(&id).unwrap();

        // then (期待する結果):
        assert_eq!(json, "\"misty\"");
    }
}
