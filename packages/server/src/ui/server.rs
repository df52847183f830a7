//! Server wiring and execution.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{IdentityRepository, MessagePusher, RoomRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryIdentityRepository, InMemoryRoomRepository},
    },
    usecase::{
        AuthenticateUseCase, BroadcastGateway, ChooseCombatantUseCase, CombatScheduler,
        ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase,
        ExitRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        MarkReadyUseCase, ShutdownUseCase,
    },
};

use super::{
    handler::{
        debug_rooms, get_room_detail, get_rooms, health_check, raw_room_detail, service_info,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Matchmaking and combat server
///
/// # Example
///
/// ```ignore
/// let server = Server::in_memory();
/// server.run("127.0.0.1".to_string(), 8000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Wire every use case on top of the given stores and pusher
    ///
    /// Dependencies are built in order:
    /// 1. BroadcastGateway
    /// 2. CombatScheduler
    /// 3. UseCases
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        rooms: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        let gateway = Arc::new(BroadcastGateway::new(
            identities.clone(),
            message_pusher.clone(),
        ));
        let scheduler = Arc::new(CombatScheduler::new(rooms.clone(), gateway.clone()));

        let state = AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(message_pusher)),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                identities.clone(),
                rooms.clone(),
                gateway.clone(),
                scheduler.clone(),
            )),
            authenticate_usecase: Arc::new(AuthenticateUseCase::new(
                identities.clone(),
                rooms.clone(),
                gateway.clone(),
                scheduler.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(rooms.clone(), gateway.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(rooms.clone(), gateway.clone())),
            mark_ready_usecase: Arc::new(MarkReadyUseCase::new(rooms.clone(), gateway.clone())),
            choose_combatant_usecase: Arc::new(ChooseCombatantUseCase::new(
                rooms.clone(),
                gateway.clone(),
                scheduler.clone(),
            )),
            exit_room_usecase: Arc::new(ExitRoomUseCase::new(
                rooms.clone(),
                gateway,
                scheduler.clone(),
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(rooms.clone())),
            shutdown_usecase: Arc::new(ShutdownUseCase::new(identities, rooms, scheduler)),
        };

        Self {
            state: Arc::new(state),
        }
    }

    /// Server backed by fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryIdentityRepository::new()),
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
        )
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(service_info))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/debug/rooms", get(debug_rooms))
            // 保存されている形そのままの Room（旧クライアント向けの別名）
            .route("/rooms", get(debug_rooms))
            .route("/rooms/{room_id}", get(raw_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Stop every battle and clear the stores
    pub async fn shutdown(&self) {
        self.state.shutdown_usecase.execute().await;
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Kumite server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.shutdown().await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
