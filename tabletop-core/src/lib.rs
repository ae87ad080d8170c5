//! Tabletop Core - Rule engines and session registry
//!
//! This crate provides the server-authoritative game logic:
//! - Checkers board geometry and the Ludo track model
//! - Checkers rule engine (mandatory and chained captures, promotion)
//! - Ludo rule engine (dice, entry, home column, captures, extra turns)
//! - Session registry binding players to game rooms

pub mod board;
pub mod track;
pub mod dice;
pub mod error;
pub mod checkers;
pub mod ludo;
pub mod game;
pub mod store;
pub mod registry;

// Re-exports for convenient access
pub use board::{Square, BOARD_SIZE};
pub use track::{LudoColor, Position, SAFE_CELLS, TRACK_LENGTH, FINISH_DISTANCE};
pub use dice::{Dice, DiceConfig, RandomDice, ScriptedDice};
pub use error::{GameError, Result};
pub use checkers::{CheckersColor, CheckersGame, CheckersMove, CheckersOutcome, Placement};
pub use ludo::{LudoGame, LudoMove, LudoMoveOutcome, RollOutcome};
pub use game::{Game, GameStatus, GameType, StateSnapshot};
pub use store::{GameStore, MemoryStore};
pub use registry::{
    AvailableGame, CreatedGame, DiceRoll, GameManager, PlayerInfo, RegistryConfig, Room, RoomObserver,
    RoomUpdate,
};
