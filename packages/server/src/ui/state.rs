//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    AuthenticateUseCase, ChooseCombatantUseCase, ConnectParticipantUseCase, CreateRoomUseCase,
    DisconnectParticipantUseCase, ExitRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    JoinRoomUseCase, MarkReadyUseCase, ShutdownUseCase,
};

/// Use cases reachable from the handlers
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub mark_ready_usecase: Arc<MarkReadyUseCase>,
    pub choose_combatant_usecase: Arc<ChooseCombatantUseCase>,
    pub exit_room_usecase: Arc<ExitRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub shutdown_usecase: Arc<ShutdownUseCase>,
}
