//! Ludo rule engine
//!
//! Turn state machine: AwaitingRoll -> AwaitingMove -> AwaitingRoll.
//! A six or a capture keeps the turn; three sixes in a row forfeit it.

use crate::dice::{Dice, RandomDice};
use crate::error::{GameError, Result};
use crate::game::GameStatus;
use crate::track::{is_safe, LudoColor, Position, FINISH_DISTANCE};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const PIECES_PER_PLAYER: usize = 4;

/// Die value that releases a piece from base and grants another roll
const SIX: u8 = 6;

/// Consecutive sixes that forfeit the turn
const MAX_CONSECUTIVE_SIXES: u8 = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LudoPiece {
    pub id: String,
    pub color: LudoColor,
    pub position: Position,
    pub is_in_play: bool,
    pub distance_traveled: u8,
}

impl LudoPiece {
    fn new(color: LudoColor, index: usize) -> Self {
        Self {
            id: format!("{}-{}", color, index),
            color,
            position: Position::Base,
            is_in_play: false,
            distance_traveled: 0,
        }
    }

    fn send_to_base(&mut self) {
        self.position = Position::Base;
        self.is_in_play = false;
        self.distance_traveled = 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LudoPlayer {
    pub id: String,
    pub name: String,
    pub color: LudoColor,
    pub pieces: Vec<LudoPiece>,
    pub finished_pieces: u8,
    pub is_active: bool,
}

/// Kind of a legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    /// Leave base onto the start cell
    Start,
    /// Advance along the shared track
    Normal,
    /// Advance inside the home column
    Home,
    /// Reach the center
    Finish,
}

/// A move the current roll allows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LudoMove {
    pub piece_id: String,
    pub from: Position,
    pub to: Position,
    #[serde(rename = "type")]
    pub move_type: MoveType,
}

/// Last applied move, kept for clients to animate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub player_id: String,
    pub piece_id: String,
    pub from: Position,
    pub to: Position,
    pub dice_value: u8,
    pub captured: Vec<String>,
}

/// Result of a dice roll
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    pub dice_value: u8,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub possible_moves: Vec<LudoMove>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub three_sixes: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub no_moves: bool,
}

/// Result of an accepted piece move
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LudoMoveOutcome {
    pub captured: Vec<String>,
    pub roll_again: bool,
    pub game_over: bool,
    pub winner: Option<String>,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// One Ludo game for two to four players
#[derive(Debug)]
pub struct LudoGame {
    id: String,
    players: Vec<LudoPlayer>,
    current_player_index: usize,
    dice_value: Option<u8>,
    consecutive_sixes: u8,
    can_roll_dice: bool,
    possible_moves: Vec<LudoMove>,
    status: GameStatus,
    winner: Option<String>,
    last_move: Option<LastMove>,
    has_rolled: bool,
    dice: Box<dyn Dice>,
}

/// Serializable view of a Ludo game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LudoSnapshot {
    pub id: String,
    pub players: Vec<LudoPlayer>,
    pub current_player_index: usize,
    pub current_player: Option<String>,
    pub dice_value: Option<u8>,
    pub consecutive_sixes: u8,
    pub can_roll_dice: bool,
    pub possible_moves: Vec<LudoMove>,
    pub status: GameStatus,
    pub winner: Option<String>,
    pub last_move: Option<LastMove>,
}

impl LudoGame {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Game with an entropy-seeded die
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_dice(id, Box::new(RandomDice::new()))
    }

    /// Game rolling the supplied die
    pub fn with_dice(id: impl Into<String>, dice: Box<dyn Dice>) -> Self {
        Self {
            id: id.into(),
            players: Vec::with_capacity(MAX_PLAYERS),
            current_player_index: 0,
            dice_value: None,
            consecutive_sixes: 0,
            can_roll_dice: true,
            possible_moves: Vec::new(),
            status: GameStatus::Waiting,
            winner: None,
            last_move: None,
            has_rolled: false,
            dice,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[LudoPlayer] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&LudoPlayer> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn current_player(&self) -> Option<&LudoPlayer> {
        self.players.get(self.current_player_index)
    }

    pub fn dice_value(&self) -> Option<u8> {
        self.dice_value
    }

    pub fn consecutive_sixes(&self) -> u8 {
        self.consecutive_sixes
    }

    pub fn can_roll_dice(&self) -> bool {
        self.can_roll_dice
    }

    pub fn possible_moves(&self) -> &[LudoMove] {
        &self.possible_moves
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    pub fn piece(&self, piece_id: &str) -> Option<&LudoPiece> {
        self.players
            .iter()
            .flat_map(|p| p.pieces.iter())
            .find(|piece| piece.id == piece_id)
    }

    /// Seats left and the first roll has not happened yet
    pub fn is_joinable(&self) -> bool {
        self.players.len() < MAX_PLAYERS
            && match self.status {
                GameStatus::Waiting => true,
                GameStatus::Playing => !self.has_rolled,
                GameStatus::Finished => false,
            }
    }

    fn active_players(&self) -> usize {
        self.players.iter().filter(|p| p.is_active).count()
    }

    // ========================================================================
    // LOBBY
    // ========================================================================

    /// Seat a player; the game starts once two are seated
    pub fn add_player(&mut self, id: &str, name: &str, color: Option<LudoColor>) -> Result<&LudoPlayer> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::CapacityError { max: MAX_PLAYERS });
        }
        if !self.is_joinable() {
            return Err(GameError::GameClosed);
        }
        if self.player(id).is_some() {
            return Err(GameError::AlreadyInGame(id.to_string()));
        }

        let taken = |c: LudoColor| self.players.iter().any(|p| p.color == c);
        let color = match color {
            Some(c) if taken(c) => return Err(GameError::ColorTaken(c.to_string())),
            Some(c) => c,
            None => LudoColor::ALL
                .into_iter()
                .find(|&c| !taken(c))
                .ok_or(GameError::CapacityError { max: MAX_PLAYERS })?,
        };

        self.players.push(LudoPlayer {
            id: id.to_string(),
            name: name.to_string(),
            color,
            pieces: (0..PIECES_PER_PLAYER).map(|i| LudoPiece::new(color, i)).collect(),
            finished_pieces: 0,
            is_active: true,
        });

        if self.status == GameStatus::Waiting && self.players.len() >= MIN_PLAYERS {
            self.status = GameStatus::Playing;
        }
        Ok(&self.players[self.players.len() - 1])
    }

    /// Abandonment
    ///
    /// In the lobby the seat is freed; during play the player is marked
    /// inactive and the last active player wins. Returns false if unknown.
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            return false;
        };

        if self.status == GameStatus::Waiting {
            self.players.remove(index);
            self.current_player_index = 0;
            return true;
        }

        if !self.players[index].is_active {
            return true;
        }
        self.players[index].is_active = false;

        if self.status != GameStatus::Playing {
            return true;
        }

        if self.active_players() <= 1 {
            let survivor = self.players.iter().find(|p| p.is_active).map(|p| p.id.clone());
            if let Some(survivor) = survivor {
                self.finish(survivor);
            }
            return true;
        }

        if index == self.current_player_index {
            self.end_turn();
        }
        true
    }

    // ========================================================================
    // DICE
    // ========================================================================

    /// Roll for the current player and compute their moves
    pub fn roll_dice(&mut self, player_id: &str) -> Result<RollOutcome> {
        self.ensure_turn(player_id)?;
        if !self.can_roll_dice {
            return Err(GameError::AlreadyRolled);
        }
        let value = self.dice.roll();
        Ok(self.resolve_roll(value))
    }

    fn resolve_roll(&mut self, value: u8) -> RollOutcome {
        self.has_rolled = true;
        self.dice_value = Some(value);

        if value == SIX {
            self.consecutive_sixes += 1;
            if self.consecutive_sixes >= MAX_CONSECUTIVE_SIXES {
                self.end_turn();
                return RollOutcome {
                    dice_value: value,
                    possible_moves: Vec::new(),
                    three_sixes: true,
                    no_moves: false,
                };
            }
        } else {
            self.consecutive_sixes = 0;
        }

        let moves = self.moves_for(self.current_player_index, value);
        if moves.is_empty() {
            self.end_turn();
            return RollOutcome {
                dice_value: value,
                possible_moves: Vec::new(),
                three_sixes: false,
                no_moves: true,
            };
        }

        self.can_roll_dice = false;
        self.possible_moves = moves.clone();
        RollOutcome {
            dice_value: value,
            possible_moves: moves,
            three_sixes: false,
            no_moves: false,
        }
    }

    /// Legal moves of a seat for a die value
    fn moves_for(&self, seat: usize, die: u8) -> Vec<LudoMove> {
        let Some(player) = self.players.get(seat) else {
            return Vec::new();
        };

        player
            .pieces
            .iter()
            .filter_map(|piece| match piece.position {
                Position::Finished => None,
                Position::Base => (die == SIX).then(|| LudoMove {
                    piece_id: piece.id.clone(),
                    from: Position::Base,
                    to: Position::Track(player.color.start_cell()),
                    move_type: MoveType::Start,
                }),
                from => {
                    let distance = piece.distance_traveled + die;
                    if distance > FINISH_DISTANCE {
                        return None;
                    }
                    let to = Position::from_distance(player.color, distance)?;
                    let move_type = match to {
                        Position::Finished => MoveType::Finish,
                        Position::Home(_) => MoveType::Home,
                        _ => MoveType::Normal,
                    };
                    Some(LudoMove {
                        piece_id: piece.id.clone(),
                        from,
                        to,
                        move_type,
                    })
                }
            })
            .collect()
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Move one of the pieces offered by the pending roll
    pub fn move_piece(&mut self, player_id: &str, piece_id: &str) -> Result<LudoMoveOutcome> {
        self.ensure_turn(player_id)?;
        let die = match self.dice_value {
            Some(die) if !self.can_roll_dice => die,
            _ => return Err(GameError::NoPendingRoll),
        };
        let mv = self
            .possible_moves
            .iter()
            .find(|m| m.piece_id == piece_id)
            .cloned()
            .ok_or_else(|| GameError::illegal(format!("{} cannot move with a {}", piece_id, die)))?;

        // Validation complete; mutate from here on
        let seat = self.current_player_index;
        let player = &mut self.players[seat];
        if let Some(piece) = player.pieces.iter_mut().find(|p| p.id == mv.piece_id) {
            if mv.move_type == MoveType::Start {
                piece.distance_traveled = 0;
                piece.is_in_play = true;
            } else {
                piece.distance_traveled += die;
            }
            piece.position = mv.to;
            if mv.to == Position::Finished {
                piece.is_in_play = false;
                player.finished_pieces += 1;
            }
        }

        let captured = match mv.to.track_cell() {
            Some(cell) if !is_safe(cell) => self.capture_at(seat, cell),
            _ => Vec::new(),
        };

        self.last_move = Some(LastMove {
            player_id: player_id.to_string(),
            piece_id: mv.piece_id.clone(),
            from: mv.from,
            to: mv.to,
            dice_value: die,
            captured: captured.clone(),
        });

        if self.players[seat].finished_pieces as usize == PIECES_PER_PLAYER {
            self.finish(player_id.to_string());
            return Ok(LudoMoveOutcome {
                captured,
                roll_again: false,
                game_over: true,
                winner: Some(player_id.to_string()),
            });
        }

        let roll_again = die == SIX || !captured.is_empty();
        self.reset_dice();
        if !roll_again {
            self.end_turn();
        }

        Ok(LudoMoveOutcome {
            captured,
            roll_again,
            ..Default::default()
        })
    }

    /// Send every opposing piece on `cell` back to base
    fn capture_at(&mut self, mover_seat: usize, cell: u8) -> Vec<String> {
        let mut captured = Vec::new();
        for (seat, player) in self.players.iter_mut().enumerate() {
            if seat == mover_seat {
                continue;
            }
            for piece in player.pieces.iter_mut() {
                if piece.position == Position::Track(cell) {
                    piece.send_to_base();
                    captured.push(piece.id.clone());
                }
            }
        }
        captured
    }

    // ========================================================================
    // TURN HELPERS
    // ========================================================================

    fn ensure_turn(&self, player_id: &str) -> Result<()> {
        if self.status != GameStatus::Playing {
            return Err(GameError::NotPlaying);
        }
        match self.current_player() {
            Some(p) if p.id == player_id && p.is_active => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    fn reset_dice(&mut self) {
        self.dice_value = None;
        self.can_roll_dice = true;
        self.possible_moves.clear();
    }

    /// Hand the dice to the next active player
    fn end_turn(&mut self) {
        self.reset_dice();
        self.consecutive_sixes = 0;

        let count = self.players.len();
        if count == 0 {
            return;
        }
        for step in 1..=count {
            let next = (self.current_player_index + step) % count;
            if self.players[next].is_active {
                self.current_player_index = next;
                return;
            }
        }
    }

    fn finish(&mut self, winner: String) {
        self.status = GameStatus::Finished;
        self.winner = Some(winner);
        self.dice_value = None;
        self.can_roll_dice = false;
        self.possible_moves.clear();
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    pub fn snapshot(&self) -> LudoSnapshot {
        LudoSnapshot {
            id: self.id.clone(),
            players: self.players.clone(),
            current_player_index: self.current_player_index,
            current_player: self.current_player().map(|p| p.id.clone()),
            dice_value: self.dice_value,
            consecutive_sixes: self.consecutive_sixes,
            can_roll_dice: self.can_roll_dice,
            possible_moves: self.possible_moves.clone(),
            status: self.status,
            winner: self.winner.clone(),
            last_move: self.last_move.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
