//! Room event stream over WebSocket
//!
//! A subscriber first receives the current state, then every event
//! published for the room until it disconnects or the room is deleted.

use crate::error::ApiError;
use crate::state::{RoomEvent, RoomEventKind, ServerState};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tabletop_core::StateSnapshot;
use tokio::sync::broadcast::{error::RecvError, Receiver};

pub async fn subscribe(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    ws: Option<WebSocketUpgrade>,
) -> Result<Response, ApiError> {
    state.manager.get_game_state(&id)?;
    let Some(ws) = ws else {
        return Ok((StatusCode::UPGRADE_REQUIRED, "expected a websocket upgrade").into_response());
    };

    // snapshot and subscription under one room lock: no event is missed or
    // older than the first message
    let (game_state, rx) = state
        .manager
        .with_state(&id, |snapshot| (snapshot.clone(), state.events.subscribe(&id)))?;
    tracing::info!("Subscriber attached to game {}", id);
    Ok(ws.on_upgrade(move |socket| stream_events(socket, id, game_state, rx)))
}

async fn stream_events(
    mut socket: WebSocket,
    game_id: String,
    initial: StateSnapshot,
    mut rx: Receiver<RoomEvent>,
) {
    let hello = RoomEvent::new(RoomEventKind::GameStateUpdate, &game_id, initial);
    if send_event(&mut socket, &hello).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber of game {} skipped {} events", game_id, skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // clients only listen; anything else is ignored
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Subscriber detached from game {}", game_id);
}

async fn send_event(socket: &mut WebSocket, event: &RoomEvent) -> Result<(), axum::Error> {
    let text = serde_json::to_string(event).map_err(axum::Error::new)?;
    socket.send(Message::Text(text)).await
}
