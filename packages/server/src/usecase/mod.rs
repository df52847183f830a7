//! UseCase 層
//!
//! 受信イベント 1 種類につき 1 つのユースケース。ドメイン層の trait
//! （`RoomRepository`, `IdentityRepository`, `MessagePusher`）にのみ依存する。

mod departure;
pub mod error;

pub mod authenticate;
pub mod choose_combatant;
pub mod combat;
pub mod connect_participant;
pub mod create_room;
pub mod disconnect_participant;
pub mod exit_room;
pub mod gateway;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod mark_ready;
pub mod shutdown;

pub use authenticate::AuthenticateUseCase;
pub use choose_combatant::ChooseCombatantUseCase;
pub use combat::CombatScheduler;
pub use connect_participant::ConnectParticipantUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    AuthenticateError, ChooseCombatantError, CreateRoomError, ExitRoomError,
    GetRoomDetailError, JoinRoomError, MarkReadyError,
};
pub use exit_room::ExitRoomUseCase;
pub use gateway::BroadcastGateway;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use mark_ready::MarkReadyUseCase;
pub use shutdown::ShutdownUseCase;
