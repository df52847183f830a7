//! UseCase 層のエラー型
//!
//! どれもクライアントには返さない（ハンドラでログに出して捨てる）。

use thiserror::Error;

use crate::domain::{CombatError, RepositoryError, RoomError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticateError {
    #[error("authenticate payload carried no identity")]
    MissingIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("identity '{0}' is already seated in a room")]
    AlreadySeated(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CreateRoomError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Room(RoomError::AlreadySeated(id)) => Self::AlreadySeated(id),
            other => Self::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("room is full")]
    RoomFull,
    #[error("identity '{0}' is already seated in a room")]
    AlreadySeated(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for JoinRoomError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Room(RoomError::RoomFull) => Self::RoomFull,
            RepositoryError::Room(RoomError::AlreadySeated(id)) => Self::AlreadySeated(id),
            other => Self::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkReadyError {
    #[error("identity '{0}' is not seated in any room")]
    NotSeated(String),
    #[error("combat is already in progress")]
    CombatInProgress,
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for MarkReadyError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotSeated(id) | RepositoryError::Room(RoomError::NotSeated(id)) => {
                Self::NotSeated(id)
            }
            RepositoryError::Room(RoomError::CombatInProgress) => Self::CombatInProgress,
            other => Self::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChooseCombatantError {
    #[error("identity '{0}' is not seated in any room")]
    NotSeated(String),
    #[error("combat is already in progress")]
    CombatInProgress,
    #[error("combat start aborted: {0}")]
    CombatAborted(CombatError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ChooseCombatantError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotSeated(id) | RepositoryError::Room(RoomError::NotSeated(id)) => {
                Self::NotSeated(id)
            }
            RepositoryError::Room(RoomError::CombatInProgress) => Self::CombatInProgress,
            other => Self::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExitRoomError {
    #[error("identity '{0}' is not seated in any room")]
    NotSeated(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
    #[error("repository error")]
    RepositoryError,
}
