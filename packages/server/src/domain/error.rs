//! Domain error types.

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("identity id must not be empty")]
    IdentityIdEmpty,
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,
    #[error("room id must not be empty")]
    RoomIdEmpty,
}

/// Room の不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room is full")]
    RoomFull,
    #[error("identity '{0}' is already seated in a room")]
    AlreadySeated(String),
    #[error("identity '{0}' is not seated in this room")]
    NotSeated(String),
    #[error("combat is already in progress")]
    CombatInProgress,
    #[error("no combat is in progress")]
    NoActiveCombat,
}

/// 戦闘開始・進行時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("combatant '{combatant}' is missing base stat '{stat}'")]
    MissingStat { combatant: String, stat: &'static str },
    #[error("combatant '{combatant}' has non-positive speed {speed}")]
    InvalidSpeed { combatant: String, speed: i32 },
    #[error("participant '{0}' has not chosen a combatant")]
    NoCombatant(String),
    #[error("combat needs exactly two participants, room has {0}")]
    NotEnoughParticipants(usize),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("identity '{0}' is not seated in any room")]
    NotSeated(String),
    #[error(transparent)]
    Room(#[from] RoomError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
