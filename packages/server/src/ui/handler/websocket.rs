//! WebSocket session handling.
//!
//! Each upgraded socket gets a server-generated connection id. Inbound text
//! frames are parsed as `ClientMessage` and dispatched to the matching use
//! case. Use case errors are never sent back; the client simply sees no event.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Identity, IdentityId, RoomId},
    infrastructure::dto::websocket::{ClientMessage, IdentityDto},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards messages from the rx channel to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_participant_usecase.execute(tx).await;
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id_clone, text);
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => dispatch(&state_clone, &connection_id_clone, message).await,
                        Err(e) => tracing::warn!("Ignoring malformed message: {}", e),
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, message: ClientMessage) {
    match message {
        ClientMessage::Authenticate { user } => {
            let identity = match user.map(Identity::try_from).transpose() {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::warn!("Invalid identity in authenticate: {}", e);
                    return;
                }
            };
            if let Err(e) = state
                .authenticate_usecase
                .execute(connection_id, identity)
                .await
            {
                tracing::debug!("authenticate ignored: {}", e);
            }
        }
        ClientMessage::CreateRoom { user } => {
            let Some(identity) = identity_of(user) else {
                return;
            };
            if let Err(e) = state
                .create_room_usecase
                .execute(connection_id, identity)
                .await
            {
                tracing::debug!("createRoom ignored: {}", e);
            }
        }
        ClientMessage::JoinRoom { room_id, user } => {
            let Some(identity) = identity_of(user) else {
                return;
            };
            let room_id = match RoomId::new(room_id) {
                Ok(room_id) => room_id,
                Err(e) => {
                    tracing::warn!("Invalid room id in joinRoom: {}", e);
                    return;
                }
            };
            if let Err(e) = state
                .join_room_usecase
                .execute(connection_id, room_id, identity)
                .await
            {
                tracing::debug!("joinRoom ignored: {}", e);
            }
        }
        ClientMessage::PlayerReady { user } => {
            let Some(identity) = identity_of(user) else {
                return;
            };
            if let Err(e) = state.mark_ready_usecase.execute(&identity.id).await {
                tracing::debug!("playerReady ignored: {}", e);
            }
        }
        ClientMessage::PokemonChosen { user, pokemon } => {
            let Some(identity) = identity_of(user) else {
                return;
            };
            if let Err(e) = state
                .choose_combatant_usecase
                .execute(&identity.id, pokemon.into())
                .await
            {
                tracing::debug!("pokemonChosen ignored: {}", e);
            }
        }
        ClientMessage::Exit { user_id } => {
            let identity_id = match IdentityId::new(user_id) {
                Ok(identity_id) => identity_id,
                Err(e) => {
                    tracing::warn!("Invalid user id in exit: {}", e);
                    return;
                }
            };
            if let Err(e) = state.exit_room_usecase.execute(&identity_id).await {
                tracing::debug!("exit ignored: {}", e);
            }
        }
    }
}

fn identity_of(dto: IdentityDto) -> Option<Identity> {
    Identity::try_from(dto)
        .inspect_err(|e| tracing::warn!("Invalid identity payload: {}", e))
        .ok()
}
