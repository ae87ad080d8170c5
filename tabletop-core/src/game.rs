//! Game dispatch: one enum over both rule engines

use crate::checkers::{self, CheckersGame, CheckersSnapshot};
use crate::dice::Dice;
use crate::error::Result;
use crate::ludo::{self, LudoGame, LudoSnapshot};
use crate::track::LudoColor;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Which rules a room plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Checkers,
    Ludo,
}

impl GameType {
    pub fn as_str(self) -> &'static str {
        match self {
            GameType::Checkers => "checkers",
            GameType::Ludo => "ludo",
        }
    }

    pub fn max_players(self) -> usize {
        match self {
            GameType::Checkers => checkers::MAX_PLAYERS,
            GameType::Ludo => ludo::MAX_PLAYERS,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// Full state of either game, tagged by `gameType`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gameType", rename_all = "lowercase")]
pub enum StateSnapshot {
    Checkers(CheckersSnapshot),
    Ludo(LudoSnapshot),
}

impl StateSnapshot {
    pub fn game_type(&self) -> GameType {
        match self {
            StateSnapshot::Checkers(_) => GameType::Checkers,
            StateSnapshot::Ludo(_) => GameType::Ludo,
        }
    }

    pub fn status(&self) -> GameStatus {
        match self {
            StateSnapshot::Checkers(s) => s.status,
            StateSnapshot::Ludo(s) => s.status,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            StateSnapshot::Checkers(s) => s.winner.as_deref(),
            StateSnapshot::Ludo(s) => s.winner.as_deref(),
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A rule engine instance owned by a room
#[derive(Debug)]
pub enum Game {
    Checkers(CheckersGame),
    Ludo(LudoGame),
}

impl Game {
    pub fn new_checkers(id: impl Into<String>) -> Self {
        Game::Checkers(CheckersGame::new(id))
    }

    pub fn new_ludo(id: impl Into<String>, dice: Box<dyn Dice>) -> Self {
        Game::Ludo(LudoGame::with_dice(id, dice))
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Game::Checkers(_) => GameType::Checkers,
            Game::Ludo(_) => GameType::Ludo,
        }
    }

    pub fn status(&self) -> GameStatus {
        match self {
            Game::Checkers(g) => g.status(),
            Game::Ludo(g) => g.status(),
        }
    }

    pub fn players_count(&self) -> usize {
        match self {
            Game::Checkers(g) => g.players().len(),
            Game::Ludo(g) => g.players().len(),
        }
    }

    pub fn max_players(&self) -> usize {
        self.game_type().max_players()
    }

    /// Name of the first seated player
    pub fn host_name(&self) -> Option<&str> {
        match self {
            Game::Checkers(g) => g.players().first().map(|p| p.name.as_str()),
            Game::Ludo(g) => g.players().first().map(|p| p.name.as_str()),
        }
    }

    pub fn is_joinable(&self) -> bool {
        match self {
            Game::Checkers(g) => g.is_joinable(),
            Game::Ludo(g) => g.is_joinable(),
        }
    }

    /// Seat a player and return the color they were given
    ///
    /// `color` is only honoured by Ludo.
    pub fn add_player(&mut self, id: &str, name: &str, color: Option<LudoColor>) -> Result<&'static str> {
        match self {
            Game::Checkers(g) => Ok(g.add_player(id, name)?.color.as_str()),
            Game::Ludo(g) => Ok(g.add_player(id, name, color)?.color.as_str()),
        }
    }

    pub fn remove_player(&mut self, player_id: &str) -> bool {
        match self {
            Game::Checkers(g) => g.remove_player(player_id),
            Game::Ludo(g) => g.remove_player(player_id),
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        match self {
            Game::Checkers(g) => StateSnapshot::Checkers(g.snapshot()),
            Game::Ludo(g) => StateSnapshot::Ludo(g.snapshot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn test_snapshot_tagged_by_game_type() {
        let mut game = Game::new_checkers("g1");
        game.add_player("p1", "Alice", None).unwrap();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["gameType"], "checkers");
        assert_eq!(json["id"], "g1");
        assert_eq!(json["status"], "waiting");

        let game = Game::new_ludo("g2", Box::new(ScriptedDice::new([6])));
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["gameType"], "ludo");
        assert_eq!(json["canRollDice"], true);
    }

    #[test]
    fn test_add_player_reports_color() {
        let mut game = Game::new_checkers("g");
        assert_eq!(game.add_player("a", "A", None).unwrap(), "white");
        assert_eq!(game.add_player("b", "B", None).unwrap(), "black");

        let mut game = Game::new_ludo("l", Box::new(ScriptedDice::new([1])));
        assert_eq!(game.add_player("a", "A", Some(LudoColor::Green)).unwrap(), "green");
        assert_eq!(game.add_player("b", "B", None).unwrap(), "red");
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_lobby_metadata() {
        let mut game = Game::new_ludo("l", Box::new(ScriptedDice::new([1])));
        assert_eq!(game.host_name(), None);
        game.add_player("a", "Host", None).unwrap();
        assert_eq!(game.host_name(), Some("Host"));
        assert_eq!(game.players_count(), 1);
        assert_eq!(game.max_players(), 4);
        assert!(game.is_joinable());
        assert_eq!(GameType::Checkers.max_players(), 2);
    }

    #[test]
    fn test_game_type_wire_format() {
        assert_eq!(serde_json::to_string(&GameType::Ludo).unwrap(), "\"ludo\"");
        let parsed: GameType = serde_json::from_str("\"checkers\"").unwrap();
        assert_eq!(parsed, GameType::Checkers);
    }
}
