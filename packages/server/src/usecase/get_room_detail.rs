//! UseCase: Room 詳細の取得

use std::sync::Arc;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, room_id: &str) -> Result<Room, GetRoomDetailError> {
        let room_id =
            RoomId::new(room_id.to_string()).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.rooms.get_room(&room_id).await.map_err(|e| match e {
            RepositoryError::RoomNotFound(_) => GetRoomDetailError::RoomNotFound,
            _ => GetRoomDetailError::RepositoryError,
        })
    }
}
