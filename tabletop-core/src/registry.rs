//! Session registry
//!
//! Binds players to rooms and routes every action to the room's engine.
//! Lock order is room, then the player maps, then the store. An observer
//! runs with the room lock held and must not call back into the registry.

use crate::checkers::CheckersMove;
use crate::dice::DiceConfig;
use crate::error::{GameError, Result};
use crate::game::{Game, GameStatus, GameType, StateSnapshot};
use crate::ludo::RollOutcome;
use crate::store::{GameStore, MemoryStore, SharedRoom};
use parking_lot::{Mutex, MutexGuard, RwLock};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// ROOM
// ============================================================================

/// One game instance and the players bound to it
#[derive(Debug)]
pub struct Room {
    id: String,
    game: Game,
    members: Vec<String>,
    created_seq: u64,
    closed: bool,
}

impl Room {
    pub fn new(id: impl Into<String>, game: Game, created_seq: u64) -> Self {
        Self {
            id: id.into(),
            game,
            members: Vec::new(),
            created_seq,
            closed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_type(&self) -> GameType {
        self.game.game_type()
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Deleted from the store; late lock holders must treat it as gone
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn summary(&self) -> AvailableGame {
        AvailableGame {
            id: self.id.clone(),
            host_name: self.game.host_name().unwrap_or_default().to_string(),
            players_count: self.game.players_count(),
            game_type: self.game.game_type(),
            max_players: self.game.max_players(),
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Registry settings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Dice handed to each new Ludo game
    pub dice: DiceConfig,
}

impl RegistryConfig {
    pub fn with_dice(mut self, dice: DiceConfig) -> Self {
        self.dice = dice;
        self
    }

    /// Reproducible dice for every Ludo game
    pub fn seeded(seed: u64) -> Self {
        Self::default().with_dice(DiceConfig::Seeded(seed))
    }
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGame {
    pub game_id: String,
    pub game_type: GameType,
}

/// Lobby listing entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableGame {
    pub id: String,
    pub host_name: String,
    pub players_count: usize,
    pub game_type: GameType,
    pub max_players: usize,
}

/// A roll and the room state it left behind
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    #[serde(flatten)]
    pub outcome: RollOutcome,
    pub game_state: StateSnapshot,
}

// ============================================================================
// OBSERVER
// ============================================================================

/// A change applied to a room
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomUpdate {
    /// `started` is set when this seat started the game
    Joined { player_id: String, started: bool },
    /// A checkers or Ludo move
    Moved { player_id: String },
    Rolled { player_id: String, dice_value: u8 },
    /// A member left and the room lives on
    Left { player_id: String },
}

/// Hears about room changes in the order each room applies them
pub trait RoomObserver: Send + Sync {
    fn room_updated(&self, game_id: &str, update: &RoomUpdate, state: &StateSnapshot);

    /// The room was deleted from the store
    fn room_closed(&self, game_id: &str);
}

// ============================================================================
// GAME MANAGER
// ============================================================================

/// Owns every room and the player bindings
pub struct GameManager<S: GameStore = MemoryStore> {
    store: S,
    player_games: RwLock<FxHashMap<String, String>>,
    players: RwLock<FxHashMap<String, PlayerInfo>>,
    config: RegistryConfig,
    next_seq: AtomicU64,
    observer: Option<Arc<dyn RoomObserver>>,
}

impl GameManager<MemoryStore> {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_store(MemoryStore::new(), config)
    }
}

impl Default for GameManager<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameStore> GameManager<S> {
    pub fn with_store(store: S, config: RegistryConfig) -> Self {
        Self {
            store,
            player_games: RwLock::new(FxHashMap::default()),
            players: RwLock::new(FxHashMap::default()),
            config,
            next_seq: AtomicU64::new(0),
            observer: None,
        }
    }

    /// Report every room change to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn RoomObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ========================================================================
    // LOBBY
    // ========================================================================

    /// Open a new room with the creator seated first
    pub fn create_game(&self, player_id: &str, name: &str, game_type: GameType) -> Result<CreatedGame> {
        self.release_finished_binding(player_id)?;

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let game_id = format!("game_{}", Uuid::new_v4());
        let game = match game_type {
            GameType::Checkers => Game::new_checkers(game_id.clone()),
            GameType::Ludo => Game::new_ludo(game_id.clone(), self.config.dice.build(seq)),
        };

        let shared: SharedRoom = Arc::new(Mutex::new(Room::new(game_id.clone(), game, seq)));
        {
            let mut room = shared.lock();
            self.seat(&mut room, player_id, name)?;
            self.store.put(game_id.clone(), Arc::clone(&shared));
        }

        tracing::info!("Player {} created {} game {}", player_id, game_type, game_id);
        Ok(CreatedGame { game_id, game_type })
    }

    /// Seat a player in an existing room
    ///
    /// A checkers game starts as soon as its second player arrives.
    pub fn join_game(&self, game_id: &str, player_id: &str, name: &str) -> Result<StateSnapshot> {
        self.release_finished_binding(player_id)?;

        let shared = self.lookup(game_id)?;
        let mut room = Self::lock_open(&shared, game_id)?;
        let was_waiting = room.game.status() == GameStatus::Waiting;
        self.seat(&mut room, player_id, name)?;

        if let Game::Checkers(game) = &mut room.game {
            if game.players().len() == crate::checkers::MAX_PLAYERS {
                game.start_game()?;
                tracing::info!("Checkers game {} started", game_id);
            }
        }

        tracing::info!("Player {} joined game {}", player_id, game_id);
        let snapshot = room.game.snapshot();
        let update = RoomUpdate::Joined {
            player_id: player_id.to_string(),
            started: was_waiting && snapshot.status() == GameStatus::Playing,
        };
        self.notify(game_id, &update, &snapshot);
        Ok(snapshot)
    }

    /// Rooms that still accept players, oldest first
    pub fn get_available_games(&self) -> Vec<AvailableGame> {
        let mut open: Vec<(u64, AvailableGame)> = self
            .store
            .rooms()
            .iter()
            .filter_map(|shared| {
                let room = shared.lock();
                (!room.closed && room.game.is_joinable()).then(|| (room.created_seq, room.summary()))
            })
            .collect();
        open.sort_by_key(|(seq, _)| *seq);
        open.into_iter().map(|(_, game)| game).collect()
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Apply a checkers move
    pub fn make_move(&self, game_id: &str, player_id: &str, mv: CheckersMove) -> Result<StateSnapshot> {
        self.with_room(game_id, |room| match &mut room.game {
            Game::Checkers(game) => {
                let outcome = game.make_move(player_id, mv)?;
                tracing::debug!(
                    "Game {}: {} moved {:?} -> {:?} (captured {:?})",
                    game_id, player_id, mv.from, mv.to, outcome.captured
                );
                if outcome.game_over {
                    tracing::info!("Game {} won by {:?}", game_id, outcome.winner);
                }
                Ok(self.moved(game_id, player_id, &room.game))
            }
            other => Err(GameError::WrongGameType {
                operation: "makeMove",
                game_type: other.game_type(),
            }),
        })
    }

    /// Roll the die for the current Ludo player
    pub fn roll_dice(&self, game_id: &str, player_id: &str) -> Result<DiceRoll> {
        self.with_room(game_id, |room| match &mut room.game {
            Game::Ludo(game) => {
                let outcome = game.roll_dice(player_id)?;
                tracing::debug!("Game {}: {} rolled {}", game_id, player_id, outcome.dice_value);
                let game_state = room.game.snapshot();
                let update = RoomUpdate::Rolled {
                    player_id: player_id.to_string(),
                    dice_value: outcome.dice_value,
                };
                self.notify(game_id, &update, &game_state);
                Ok(DiceRoll { outcome, game_state })
            }
            other => Err(GameError::WrongGameType {
                operation: "rollDice",
                game_type: other.game_type(),
            }),
        })
    }

    /// Move a Ludo piece with the pending roll
    pub fn move_ludo_piece(&self, game_id: &str, player_id: &str, piece_id: &str) -> Result<StateSnapshot> {
        self.with_room(game_id, |room| match &mut room.game {
            Game::Ludo(game) => {
                let outcome = game.move_piece(player_id, piece_id)?;
                tracing::debug!(
                    "Game {}: {} moved {} (captured {:?})",
                    game_id, player_id, piece_id, outcome.captured
                );
                if outcome.game_over {
                    tracing::info!("Game {} won by {:?}", game_id, outcome.winner);
                }
                Ok(self.moved(game_id, player_id, &room.game))
            }
            other => Err(GameError::WrongGameType {
                operation: "moveLudoPiece",
                game_type: other.game_type(),
            }),
        })
    }

    pub fn get_game_state(&self, game_id: &str) -> Result<StateSnapshot> {
        self.with_room(game_id, |room| Ok(room.game.snapshot()))
    }

    /// Run `f` on the current state while the room stays locked
    ///
    /// No update for the room can be reported until `f` returns.
    pub fn with_state<T>(&self, game_id: &str, f: impl FnOnce(&StateSnapshot) -> T) -> Result<T> {
        self.with_room(game_id, |room| Ok(f(&room.game.snapshot())))
    }

    /// Take a player out of a room
    ///
    /// Idempotent. Returns the room's state afterwards if the player was a
    /// member and the room survives; an emptied room is deleted.
    pub fn remove_player(&self, game_id: &str, player_id: &str) -> Option<StateSnapshot> {
        let Some(shared) = self.store.get(game_id) else {
            self.unbind(game_id, player_id);
            return None;
        };

        let mut room = shared.lock();
        if room.closed {
            self.unbind(game_id, player_id);
            return None;
        }

        let was_member = room.members.iter().any(|m| m == player_id);
        room.game.remove_player(player_id);
        room.members.retain(|m| m != player_id);
        self.unbind(game_id, player_id);

        if room.members.is_empty() {
            room.closed = true;
            self.store.delete(game_id);
            tracing::info!("Game {} closed, last player left", game_id);
            if let Some(observer) = &self.observer {
                observer.room_closed(game_id);
            }
            return None;
        }

        if !was_member {
            return None;
        }
        tracing::info!("Player {} left game {}", player_id, game_id);
        let snapshot = room.game.snapshot();
        let update = RoomUpdate::Left {
            player_id: player_id.to_string(),
        };
        self.notify(game_id, &update, &snapshot);
        Some(snapshot)
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    pub fn get_player_game(&self, player_id: &str) -> Option<String> {
        self.player_games.read().get(player_id).cloned()
    }

    pub fn get_player(&self, player_id: &str) -> Option<PlayerInfo> {
        self.players.read().get(player_id).cloned()
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn lookup(&self, game_id: &str) -> Result<SharedRoom> {
        self.store
            .get(game_id)
            .ok_or_else(|| GameError::NotFound(game_id.to_string()))
    }

    fn lock_open<'a>(shared: &'a SharedRoom, game_id: &str) -> Result<MutexGuard<'a, Room>> {
        let room = shared.lock();
        if room.closed {
            return Err(GameError::NotFound(game_id.to_string()));
        }
        Ok(room)
    }

    /// Run `f` on a room under its lock; rejected actions are logged
    fn with_room<T>(&self, game_id: &str, f: impl FnOnce(&mut Room) -> Result<T>) -> Result<T> {
        let shared = self.lookup(game_id)?;
        let mut room = Self::lock_open(&shared, game_id)?;
        f(&mut room).map_err(|e| {
            tracing::debug!("Game {}: rejected ({})", game_id, e);
            e
        })
    }

    fn notify(&self, game_id: &str, update: &RoomUpdate, state: &StateSnapshot) {
        if let Some(observer) = &self.observer {
            observer.room_updated(game_id, update, state);
        }
    }

    /// Snapshot after a move, reported before the room is unlocked
    fn moved(&self, game_id: &str, player_id: &str, game: &Game) -> StateSnapshot {
        let snapshot = game.snapshot();
        let update = RoomUpdate::Moved {
            player_id: player_id.to_string(),
        };
        self.notify(game_id, &update, &snapshot);
        snapshot
    }

    /// Add the player to the engine and bind them, atomically against other joins
    fn seat(&self, room: &mut Room, player_id: &str, name: &str) -> Result<()> {
        let mut bindings = self.player_games.write();
        if bindings.contains_key(player_id) {
            return Err(GameError::AlreadyInGame(player_id.to_string()));
        }

        let color = room.game.add_player(player_id, name, None)?;
        bindings.insert(player_id.to_string(), room.id.clone());
        room.members.push(player_id.to_string());
        self.players.write().insert(
            player_id.to_string(),
            PlayerInfo {
                id: player_id.to_string(),
                name: name.to_string(),
                color: color.to_string(),
            },
        );
        Ok(())
    }

    /// Drop the player's maps if they still point at `game_id`
    fn unbind(&self, game_id: &str, player_id: &str) {
        let mut bindings = self.player_games.write();
        if bindings.get(player_id).map(String::as_str) == Some(game_id) {
            bindings.remove(player_id);
            self.players.write().remove(player_id);
        }
    }

    /// Free the player from a finished or vanished game
    ///
    /// Fails with `AlreadyInGame` while their game is still running.
    fn release_finished_binding(&self, player_id: &str) -> Result<()> {
        let Some(game_id) = self.get_player_game(player_id) else {
            return Ok(());
        };

        let running = match self.store.get(&game_id) {
            Some(shared) => {
                let room = shared.lock();
                !room.closed && room.game.status() != GameStatus::Finished
            }
            None => false,
        };
        if running {
            return Err(GameError::AlreadyInGame(player_id.to_string()));
        }

        self.remove_player(&game_id, player_id);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
