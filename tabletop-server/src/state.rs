//! Server state management
//!
//! The registry plus one broadcast channel per room. The registry reports
//! room changes while the room is locked, so each channel carries events in
//! the order the room applied them.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;
use tabletop_core::{
    GameManager, GameStatus, RegistryConfig, RoomObserver, RoomUpdate, StateSnapshot,
};
use tokio::sync::broadcast;

/// Events buffered per subscriber before it starts lagging
const ROOM_CHANNEL_CAPACITY: usize = 64;

/// What happened in a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomEventKind {
    GameStateUpdate,
    GameStarted,
    DiceRolled,
    GameEnded,
    OpponentLeft,
}

/// Message pushed to every subscriber of a room
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    #[serde(rename = "type")]
    pub kind: RoomEventKind,
    pub game_id: String,
    pub game_state: StateSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice_value: Option<u8>,
}

impl RoomEvent {
    pub fn new(kind: RoomEventKind, game_id: &str, game_state: StateSnapshot) -> Self {
        Self {
            kind,
            game_id: game_id.to_string(),
            game_state,
            player_id: None,
            dice_value: None,
        }
    }

    pub fn with_player(mut self, player_id: &str) -> Self {
        self.player_id = Some(player_id.to_string());
        self
    }

    pub fn with_dice(mut self, value: u8) -> Self {
        self.dice_value = Some(value);
        self
    }
}

/// Broadcast channels keyed by game id
#[derive(Default)]
pub struct RoomEvents {
    channels: Mutex<FxHashMap<String, broadcast::Sender<RoomEvent>>>,
}

impl RoomEvents {
    pub fn subscribe(&self, game_id: &str) -> broadcast::Receiver<RoomEvent> {
        self.channels
            .lock()
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Send to current subscribers; a room nobody listens to drops the event
    pub fn publish(&self, event: RoomEvent) {
        let channels = self.channels.lock();
        if let Some(sender) = channels.get(&event.game_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!("No listeners for game {}", e.0.game_id);
            }
        }
    }

    /// Drop a room's channel; subscribers see the stream end
    pub fn close(&self, game_id: &str) {
        self.channels.lock().remove(game_id);
    }

    pub fn subscriber_count(&self, game_id: &str) -> usize {
        self.channels
            .lock()
            .get(game_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}

impl RoomObserver for RoomEvents {
    fn room_updated(&self, game_id: &str, update: &RoomUpdate, state: &StateSnapshot) {
        match update {
            RoomUpdate::Joined { started, .. } => {
                self.publish(RoomEvent::new(RoomEventKind::GameStateUpdate, game_id, state.clone()));
                if *started {
                    self.publish(RoomEvent::new(RoomEventKind::GameStarted, game_id, state.clone()));
                }
            }
            RoomUpdate::Moved { .. } => {
                self.publish(RoomEvent::new(RoomEventKind::GameStateUpdate, game_id, state.clone()));
                if state.status() == GameStatus::Finished {
                    let mut ended = RoomEvent::new(RoomEventKind::GameEnded, game_id, state.clone());
                    ended.player_id = state.winner().map(str::to_string);
                    self.publish(ended);
                }
            }
            RoomUpdate::Rolled { player_id, dice_value } => {
                self.publish(
                    RoomEvent::new(RoomEventKind::DiceRolled, game_id, state.clone())
                        .with_player(player_id)
                        .with_dice(*dice_value),
                );
            }
            RoomUpdate::Left { player_id } => {
                self.publish(
                    RoomEvent::new(RoomEventKind::OpponentLeft, game_id, state.clone()).with_player(player_id),
                );
            }
        }
    }

    fn room_closed(&self, game_id: &str) {
        self.close(game_id);
        tracing::debug!("Closed event stream of game {}", game_id);
    }
}

/// Server-wide shared state
pub struct ServerState {
    pub manager: GameManager,
    pub events: Arc<RoomEvents>,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let events = Arc::new(RoomEvents::default());
        Self {
            manager: GameManager::with_config(config).with_observer(events.clone()),
            events,
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
