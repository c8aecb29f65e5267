//! WebSocket handler for real-time room play.
//!
//! Each connection gets a fresh player id, the in-game identity for
//! its lifetime. Clients send JSON commands (create a room, join one,
//! start a round, act, leave); the server answers each command and
//! pushes room events as they happen. After every event the connection
//! fetches its own redacted view from the room actor, so hands other
//! than the viewer's never travel over a shared path before showdown.
//!
//! # Client Messages
//!
//! ```json
//! { "type": "create_room", "player_name": "kim", "start_chips": 100000, "ante": 1000 }
//! { "type": "join_room", "room_id": "1234", "player_name": "lee" }
//! { "type": "start_round" }
//! { "type": "action", "action": "half" }
//! { "type": "leave" }
//! ```

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use seotda::game::entities::{BetAction, Chips, PlayerId};
use seotda::room::{
    RoomConfig, RoomError, RoomId, RoomMessage, RoomNotification, RoomView, notification_channel,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::metrics;

/// Client messages received via WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Open a room and become its host. Omitted stakes fall back to
    /// the server defaults.
    CreateRoom {
        player_name: String,
        start_chips: Option<Chips>,
        ante: Option<Chips>,
    },
    /// Join an existing room by its code.
    JoinRoom {
        room_id: String,
        player_name: String,
    },
    /// Start the next round (host only).
    StartRound,
    /// Take a betting action.
    Action { action: BetAction },
    /// Leave the current room.
    Leave,
}

/// Messages sent to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    RoomCreated { room_id: RoomId, player_id: PlayerId },
    Joined { room_id: RoomId, is_spectator: bool },
    Left,
    Success { message: String },
    Error { message: String },
    View { view: RoomView },
    Event { event: RoomNotification },
}

/// Upgrade the HTTP connection to a WebSocket.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    metrics::websocket_connections_total();
    let open = state.open_connections.fetch_add(1, Ordering::Relaxed) + 1;
    metrics::websocket_connections_active(open);
    info!("WebSocket connected: player={player_id}");

    // The room this connection currently sits in; shared with the
    // send task so view fetches follow room changes.
    let current_room: Arc<RwLock<Option<RoomId>>> = Arc::new(RwLock::new(None));

    // Channel for command responses out of the receive loop.
    let (response_tx, mut response_rx) = mpsc::channel::<String>(32);

    // Channel the room actor pushes notifications into.
    let (notification_tx, mut notification_rx) = notification_channel();

    // Send task: forwards command responses and, for every room
    // event, pushes the event plus this player's fresh view.
    let send_state = state.clone();
    let send_room = current_room.clone();
    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(notification) = notification_rx.recv() => {
                    let event = ServerMessage::Event { event: notification };
                    let Ok(json) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }

                    let room_id = send_room.read().await.clone();
                    let Some(room_id) = room_id else { continue };
                    let Some(handle) = send_state.room_manager.get_room(&room_id).await else {
                        continue;
                    };
                    let (tx, rx) = oneshot::channel();
                    let request = RoomMessage::GetView {
                        player_id: Some(player_id),
                        response: tx,
                    };
                    if handle.send(request).await.is_err() {
                        continue;
                    }
                    if let Ok(view) = rx.await {
                        let message = ServerMessage::View { view };
                        let Ok(json) = serde_json::to_string(&message) else {
                            continue;
                        };
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                }
                Some(json) = response_rx.recv() => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                else => break,
            }
        }
    });

    // Receive loop: parse and dispatch client commands.
    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                metrics::websocket_messages_received();
                debug!("player {player_id}: {text}");

                let response = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_message) => {
                        handle_client_message(
                            client_message,
                            player_id,
                            &current_room,
                            &notification_tx,
                            &state,
                        )
                        .await
                    }
                    Err(e) => {
                        warn!("player {player_id}: unparseable message: {e}");
                        ServerMessage::Error {
                            message: "unknown request".to_string(),
                        }
                    }
                };

                if let Ok(json) = serde_json::to_string(&response)
                    && response_tx.send(json).await.is_err()
                {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed: player={player_id}");
                break;
            }
            Err(e) => {
                warn!("WebSocket error for player {player_id}: {e}");
                break;
            }
            _ => {}
        }
    }

    // Cleanup: the departing player folds out of any live round and
    // their seat is released.
    send_task.abort();
    let room_id = current_room.read().await.clone();
    if let Some(room_id) = room_id {
        state.room_manager.disconnect(&room_id, player_id).await;
        metrics::active_rooms(state.room_manager.room_count().await);
    }

    let open = state.open_connections.fetch_sub(1, Ordering::Relaxed) - 1;
    metrics::websocket_connections_active(open);
    info!("WebSocket disconnected: player={player_id}");
}

/// Process one client command and produce the reply.
async fn handle_client_message(
    message: ClientMessage,
    player_id: PlayerId,
    current_room: &Arc<RwLock<Option<RoomId>>>,
    notification_tx: &mpsc::Sender<RoomNotification>,
    state: &AppState,
) -> ServerMessage {
    match message {
        ClientMessage::CreateRoom {
            player_name,
            start_chips,
            ante,
        } => {
            if current_room.read().await.is_some() {
                return ServerMessage::Error {
                    message: RoomError::AlreadyJoined.to_string(),
                };
            }

            let defaults = &state.config.room_defaults;
            let config = RoomConfig {
                start_chips: start_chips.unwrap_or(defaults.start_chips),
                ante: ante.unwrap_or(defaults.ante),
                next_round_delay: defaults.next_round_delay,
                ..RoomConfig::default()
            };

            let handle = match state
                .room_manager
                .create_room(player_id, player_name, config)
                .await
            {
                Ok(handle) => handle,
                Err(e) => {
                    return ServerMessage::Error {
                        message: e.to_string(),
                    };
                }
            };

            let room_id = handle.room_id().clone();
            let subscribed = handle
                .send(RoomMessage::Subscribe {
                    player_id,
                    sender: notification_tx.clone(),
                })
                .await;
            if subscribed.is_err() {
                return ServerMessage::Error {
                    message: RoomError::NotFound.to_string(),
                };
            }

            *current_room.write().await = Some(room_id.clone());
            metrics::rooms_created_total();
            metrics::active_rooms(state.room_manager.room_count().await);

            ServerMessage::RoomCreated { room_id, player_id }
        }

        ClientMessage::JoinRoom {
            room_id,
            player_name,
        } => {
            if current_room.read().await.is_some() {
                return ServerMessage::Error {
                    message: RoomError::AlreadyJoined.to_string(),
                };
            }

            match state
                .room_manager
                .join_room(&room_id, player_id, player_name)
                .await
            {
                Ok(is_spectator) => {
                    if let Some(handle) = state.room_manager.get_room(&room_id).await {
                        let _ = handle
                            .send(RoomMessage::Subscribe {
                                player_id,
                                sender: notification_tx.clone(),
                            })
                            .await;
                    }
                    *current_room.write().await = Some(room_id.clone());
                    ServerMessage::Joined {
                        room_id,
                        is_spectator,
                    }
                }
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }

        ClientMessage::StartRound => {
            let Some(handle) = room_handle(current_room, state).await else {
                return ServerMessage::Error {
                    message: RoomError::NotFound.to_string(),
                };
            };

            let (tx, rx) = oneshot::channel();
            let request = RoomMessage::StartRound {
                player_id,
                response: tx,
            };
            if handle.send(request).await.is_err() {
                return ServerMessage::Error {
                    message: RoomError::Closed.to_string(),
                };
            }
            match rx.await {
                Ok(Ok(())) => ServerMessage::Success {
                    message: "round started".to_string(),
                },
                Ok(Err(e)) => ServerMessage::Error {
                    message: e.to_string(),
                },
                Err(_) => ServerMessage::Error {
                    message: RoomError::Closed.to_string(),
                },
            }
        }

        ClientMessage::Action { action } => {
            let Some(handle) = room_handle(current_room, state).await else {
                return ServerMessage::Error {
                    message: RoomError::NotFound.to_string(),
                };
            };

            let (tx, rx) = oneshot::channel();
            let request = RoomMessage::TakeAction {
                player_id,
                action,
                response: tx,
            };
            if handle.send(request).await.is_err() {
                return ServerMessage::Error {
                    message: RoomError::Closed.to_string(),
                };
            }
            match rx.await {
                Ok(Ok(())) => {
                    metrics::actions_total(&action_name(action));
                    ServerMessage::Success {
                        message: format!("{action}"),
                    }
                }
                Ok(Err(e)) => ServerMessage::Error {
                    message: e.to_string(),
                },
                Err(_) => ServerMessage::Error {
                    message: RoomError::Closed.to_string(),
                },
            }
        }

        ClientMessage::Leave => {
            let room_id = current_room.write().await.take();
            match room_id {
                Some(room_id) => {
                    state.room_manager.disconnect(&room_id, player_id).await;
                    metrics::active_rooms(state.room_manager.room_count().await);
                    ServerMessage::Left
                }
                None => ServerMessage::Error {
                    message: RoomError::NotFound.to_string(),
                },
            }
        }
    }
}

async fn room_handle(
    current_room: &Arc<RwLock<Option<RoomId>>>,
    state: &AppState,
) -> Option<seotda::room::RoomHandle> {
    let room_id = current_room.read().await.clone()?;
    state.room_manager.get_room(&room_id).await
}

fn action_name(action: BetAction) -> String {
    match action {
        BetAction::Die => "die",
        BetAction::Call => "call",
        BetAction::Half => "half",
        BetAction::Ddadang => "ddadang",
        BetAction::AllIn => "allin",
    }
    .to_string()
}
